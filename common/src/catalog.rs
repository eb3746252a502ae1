//! 薬品名カタログモジュール
//!
//! 改行区切りのテキストから既知の薬品名を読み込み、プロセス生存中は
//! メモリ上に保持する。
//!
//! ## 差し替えの原子性
//! - 解析（行分割・トリム）はロック外で行う
//! - 書き込みロックは `Arc` の差し替えのみに使う
//!
//! そのため読み手は常に「差し替え前の全体」か「差し替え後の全体」を見る。

use crate::error::{Error, Result};
use crate::types::CatalogEntry;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

const BOM: char = '\u{FEFF}';

/// カタログストア
#[derive(Debug, Default)]
pub struct CatalogStore {
    entries: RwLock<Arc<Vec<CatalogEntry>>>,
}

impl CatalogStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// テキストから直接作成
    pub fn from_source(source: &str) -> Result<Self> {
        let store = Self::new();
        store.load(source)?;
        Ok(store)
    }

    /// テキストを読み込み、カタログ全体を差し替える
    ///
    /// 空行は無視し、残りの各行をトリムしてエントリにする。
    ///
    /// # Returns
    /// 新しいカタログの件数
    pub fn load(&self, source: &str) -> Result<usize> {
        let parsed = parse_source(source);
        let count = parsed.len();
        self.replace(parsed);
        info!(entries = count, "catalog replaced");
        Ok(count)
    }

    /// バイト列をUTF-8として解釈して読み込む
    ///
    /// 先頭のBOMは `load` と同じく読み飛ばす。
    ///
    /// デコードに失敗した場合は `Error::CatalogLoad` を返し、
    /// 既存のカタログは変更しない。
    pub fn load_bytes(&self, source: &[u8]) -> Result<usize> {
        let text = std::str::from_utf8(source).map_err(|e| {
            Error::CatalogLoad(format!(
                "source is not valid UTF-8 (valid up to byte {}): {}",
                e.valid_up_to(),
                e
            ))
        })?;
        self.load(text)
    }

    /// エントリ数
    pub fn size(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// 現時点のスナップショット
    pub fn all(&self) -> Arc<Vec<CatalogEntry>> {
        self.read()
    }

    fn read(&self) -> Arc<Vec<CatalogEntry>> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn replace(&self, parsed: Vec<CatalogEntry>) {
        let next = Arc::new(parsed);
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}

/// ソーステキストをエントリ列に変換
///
/// 先頭のBOMは名前に含めない。
fn parse_source(source: &str) -> Vec<CatalogEntry> {
    let source = source.strip_prefix(BOM).unwrap_or(source);
    let entries: Vec<CatalogEntry> = source.lines().filter_map(CatalogEntry::from_line).collect();
    debug!(
        lines = source.lines().count(),
        entries = entries.len(),
        "catalog source parsed"
    );
    entries
}
