//! 照合結果の型定義
//!
//! CLIとライブラリ利用側で共有される型:
//! - CatalogEntry: カタログの1行（薬品名）
//! - MatchCandidate: 1件の候補とスコア
//! - MatchResult: 照合の最終出力

use serde::{Deserialize, Serialize};

/// カタログエントリ
///
/// 同名のエントリが複数あってもよい。識別はカタログ内の位置で行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// 表示名（前後の空白を除去済み）
    pub name: String,
    /// 元の行（トリム前、監査用）
    pub source_line: String,
}

impl CatalogEntry {
    /// ソース行からエントリを作成（空行ならNone）
    pub fn from_line(line: &str) -> Option<Self> {
        let name = line.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            source_line: line.to_string(),
        })
    }
}

/// 照合候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub name: String,
    /// 類似度 (0.0-1.0)
    pub score: f64,
}

/// 照合結果
///
/// `confidence` は閾値に関係なく常に最上位候補のスコア。
/// `best_match` は最上位候補が閾値以上のときだけ設定される。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub best_match: Option<String>,
    pub confidence: f64,
    #[serde(default)]
    pub top_candidates: Vec<MatchCandidate>,
}

impl MatchResult {
    /// 空カタログ用の結果
    pub fn empty() -> Self {
        Self::default()
    }

    /// 自動採用できるか
    pub fn is_accepted(&self) -> bool {
        self.best_match.is_some()
    }
}
