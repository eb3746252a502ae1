//! カタログファイル読み込みモジュール
//!
//! ファイルI/Oはコアの外側の責務。ここでバイト列を読み、
//! 監査用のSHA-256指紋を取ってから `CatalogStore::load_bytes` に渡す。

use crate::error::{Result, RxMatchError};
use rx_match_common::CatalogStore;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

/// 読み込んだカタログの情報
#[derive(Debug, Clone)]
pub struct CatalogInfo {
    pub path: String,
    pub entries: usize,
    /// ソースのSHA-256（hex）
    pub fingerprint: String,
}

/// ファイルからカタログを読み込む
///
/// 読み込みに失敗した場合、ストアの中身は変わらない。
pub fn load_catalog_file(store: &CatalogStore, path: &Path) -> Result<CatalogInfo> {
    if !path.exists() {
        return Err(RxMatchError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let entries = store.load_bytes(&bytes)?;
    let fingerprint = fingerprint(&bytes);

    info!(path = %path.display(), entries, fingerprint = %fingerprint, "catalog file loaded");

    Ok(CatalogInfo {
        path: path.display().to_string(),
        entries,
        fingerprint,
    })
}

/// ソースバイト列の指紋
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
