//! rx-match
//!
//! 薬品パッケージのOCR結果をカタログと照合するCLI。
//! 照合のコアは `rx_match_common` にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod catalog_source;
pub mod prescription;
pub mod review;

pub use rx_match_common as common;
