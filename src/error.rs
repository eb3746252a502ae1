use thiserror::Error;

#[derive(Error, Debug)]
pub enum RxMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("カタログが指定されていません。`rx-match config --set-catalog PATH` または --catalog で指定してください")]
    CatalogNotLoaded,

    #[error("閾値が範囲外です（0.0-1.0）: {0}")]
    InvalidThreshold(f64),

    #[error("候補にない薬品名です: {0}")]
    UnknownCandidate(String),

    #[error("行番号が範囲外です: {0}")]
    LineNotFound(usize),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Common(#[from] rx_match_common::Error),
}

pub type Result<T> = std::result::Result<T, RxMatchError>;
