//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// 照合そのものは失敗しない。失敗し得るのはカタログ読み込みだけ。
#[derive(Error, Debug)]
pub enum Error {
    /// カタログ読み込み失敗（直前のカタログはそのまま残る）
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
