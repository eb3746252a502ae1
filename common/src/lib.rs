//! rx-match Common Library
//!
//! 薬品パッケージのOCR文字列をカタログの既知薬品名と照合するコア。
//! 画像処理・通信・永続化は含まない。

pub mod types;
pub mod error;
pub mod catalog;
pub mod matcher;

pub use types::{CatalogEntry, MatchCandidate, MatchResult};
pub use error::{Error, Result};
pub use catalog::CatalogStore;
pub use matcher::{find_best_match, find_best_match_in, similarity, DEFAULT_THRESHOLD, TOP_CANDIDATES};
