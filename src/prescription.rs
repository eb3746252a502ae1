//! 処方セッションモジュール
//!
//! 1枚の処方に含まれる複数の薬品（OCR結果の各行）をまとめて照合し、
//! 自動採用・要確認・認識不可に振り分ける。
//!
//! ## 処理フロー
//! 1. 空行を除去し、上限件数で打ち切る
//! 2. 各行を並列に照合（結果の順序は入力順のまま）
//! 3. 要確認の行は人の選択で確定させる
//! 4. 採用された薬品名の一覧を下流（入力自動化クライアント）へ渡す

use crate::error::{Result, RxMatchError};
use rayon::prelude::*;
use rx_match_common::{find_best_match_in, CatalogStore, MatchResult};
use serde::Serialize;
use tracing::{debug, warn};

/// 行の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStatus {
    /// 閾値以上で自動採用
    Accepted,
    /// 人が候補から選んで確定
    Confirmed,
    /// 候補はあるが閾値未満
    NeedsReview,
    /// 候補なし（カタログが空）
    Unrecognized,
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineStatus::Accepted => write!(f, "自動採用"),
            LineStatus::Confirmed => write!(f, "確認済み"),
            LineStatus::NeedsReview => write!(f, "要確認"),
            LineStatus::Unrecognized => write!(f, "認識不可"),
        }
    }
}

/// 処方の1行
#[derive(Debug, Clone)]
pub struct PrescriptionLine {
    /// セッション内の位置（0始まり）
    pub index: usize,
    /// OCRテキスト（トリム済み）
    pub query: String,
    pub result: MatchResult,
    /// 人が確定させた薬品名
    pub confirmed: Option<String>,
}

impl PrescriptionLine {
    pub fn status(&self) -> LineStatus {
        if self.confirmed.is_some() {
            LineStatus::Confirmed
        } else if self.result.is_accepted() {
            LineStatus::Accepted
        } else if self.result.top_candidates.is_empty() {
            LineStatus::Unrecognized
        } else {
            LineStatus::NeedsReview
        }
    }

    /// 採用された薬品名（確定 > 自動採用）
    pub fn accepted_name(&self) -> Option<&str> {
        self.confirmed
            .as_deref()
            .or(self.result.best_match.as_deref())
    }
}

/// 処方セッション
#[derive(Debug, Clone)]
pub struct PrescriptionSession {
    pub threshold: f64,
    /// 上限を超えて打ち切ったか
    pub truncated: bool,
    pub lines: Vec<PrescriptionLine>,
}

impl PrescriptionSession {
    /// OCRテキスト（1行1薬品）から照合する
    pub fn from_text(store: &CatalogStore, text: &str, threshold: f64, max_drugs: usize) -> Self {
        Self::match_lines(store, text.lines(), threshold, max_drugs)
    }

    /// 複数行をまとめて照合する
    ///
    /// # Arguments
    /// * `store` - カタログストア（呼び出し時点のスナップショットを使う）
    /// * `queries` - OCRテキストの各行
    /// * `threshold` - 自動採用の閾値
    /// * `max_drugs` - 1処方あたりの上限件数
    pub fn match_lines<'a>(
        store: &CatalogStore,
        queries: impl IntoIterator<Item = &'a str>,
        threshold: f64,
        max_drugs: usize,
    ) -> Self {
        let mut queries: Vec<&str> = queries
            .into_iter()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .collect();

        let truncated = queries.len() > max_drugs;
        if truncated {
            warn!(
                supplied = queries.len(),
                limit = max_drugs,
                "too many drugs in one prescription, extra lines dropped"
            );
            queries.truncate(max_drugs);
        }

        let snapshot = store.all();
        let lines: Vec<PrescriptionLine> = queries
            .par_iter()
            .enumerate()
            .map(|(index, query)| PrescriptionLine {
                index,
                query: (*query).to_string(),
                result: find_best_match_in(&snapshot, query, threshold),
                confirmed: None,
            })
            .collect();

        debug!(lines = lines.len(), catalog = snapshot.len(), "prescription matched");

        Self {
            threshold,
            truncated,
            lines,
        }
    }

    /// 要確認の行
    pub fn pending(&self) -> impl Iterator<Item = &PrescriptionLine> {
        self.lines
            .iter()
            .filter(|l| l.status() == LineStatus::NeedsReview)
    }

    /// 採用された薬品名（入力順）
    pub fn accepted_names(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|l| l.accepted_name().map(str::to_string))
            .collect()
    }

    /// 要確認の行を候補の中から確定させる
    ///
    /// 候補にない名前は受け付けない。
    pub fn resolve(&mut self, index: usize, name: &str) -> Result<()> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(RxMatchError::LineNotFound(index))?;

        if !line.result.top_candidates.iter().any(|c| c.name == name) {
            return Err(RxMatchError::UnknownCandidate(name.to_string()));
        }

        debug!(index, query = %line.query, name, "line confirmed");
        line.confirmed = Some(name.to_string());
        Ok(())
    }

    /// JSON出力用のレポートを作成
    pub fn report(&self, catalog_fingerprint: Option<String>) -> SessionReport {
        SessionReport {
            generated_at: chrono::Local::now().to_rfc3339(),
            catalog_fingerprint,
            threshold: self.threshold,
            truncated: self.truncated,
            accepted: self.accepted_names(),
            lines: self
                .lines
                .iter()
                .map(|l| ReportLine {
                    index: l.index,
                    query: l.query.clone(),
                    status: l.status(),
                    accepted_name: l.accepted_name().map(str::to_string),
                    result: l.result.clone(),
                })
                .collect(),
        }
    }
}

/// セッションレポート
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub generated_at: String,
    pub catalog_fingerprint: Option<String>,
    pub threshold: f64,
    pub truncated: bool,
    pub accepted: Vec<String>,
    pub lines: Vec<ReportLine>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub index: usize,
    pub query: String,
    pub status: LineStatus,
    pub accepted_name: Option<String>,
    pub result: MatchResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CatalogStore {
        CatalogStore::from_source("Parol 500mg\nAspirin 100mg\nParolex\nAugmentin\nMajezik\n").unwrap()
    }

    #[test]
    fn test_match_lines_keeps_order_and_drops_blanks() {
        let session = PrescriptionSession::from_text(&store(), "augmentin\n\n  parol \nmajezk\n", 0.7, 50);

        assert_eq!(session.lines.len(), 3);
        assert_eq!(session.lines[0].query, "augmentin");
        assert_eq!(session.lines[1].query, "parol");
        assert_eq!(session.lines[2].query, "majezk");
        assert_eq!(
            session.lines.iter().map(|l| l.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(!session.truncated);
    }

    #[test]
    fn test_statuses() {
        let session = PrescriptionSession::from_text(&store(), "Augmentin\nqqqqqqqqqq\n", 0.7, 50);

        assert_eq!(session.lines[0].status(), LineStatus::Accepted);
        assert_eq!(session.lines[1].status(), LineStatus::NeedsReview);
        assert_eq!(session.pending().count(), 1);
        assert_eq!(session.accepted_names(), vec!["Augmentin"]);
    }

    #[test]
    fn test_empty_catalog_is_unrecognized() {
        let session = PrescriptionSession::from_text(&CatalogStore::new(), "Augmentin\n", 0.7, 50);

        assert_eq!(session.lines[0].status(), LineStatus::Unrecognized);
        assert!(session.accepted_names().is_empty());
    }

    #[test]
    fn test_truncates_at_limit() {
        let text = "Parol\n".repeat(5);
        let session = PrescriptionSession::from_text(&store(), &text, 0.7, 3);

        assert!(session.truncated);
        assert_eq!(session.lines.len(), 3);
    }

    #[test]
    fn test_exactly_at_limit_is_not_truncated() {
        let text = "Parol\nAugmentin\nMajezik\n";
        let session = PrescriptionSession::from_text(&store(), text, 0.7, 3);

        assert!(!session.truncated);
        assert_eq!(session.lines.len(), 3);
    }

    #[test]
    fn test_resolve_with_candidate() {
        let mut session = PrescriptionSession::from_text(&store(), "Parolx 500\n", 0.95, 50);
        assert_eq!(session.lines[0].status(), LineStatus::NeedsReview);

        session.resolve(0, "Parol 500mg").unwrap();

        assert_eq!(session.lines[0].status(), LineStatus::Confirmed);
        assert_eq!(session.accepted_names(), vec!["Parol 500mg"]);
        assert_eq!(session.pending().count(), 0);
    }

    #[test]
    fn test_resolve_rejects_unknown_name() {
        let mut session = PrescriptionSession::from_text(&store(), "Parolx\n", 0.95, 50);

        let err = session.resolve(0, "Ibuprofen").unwrap_err();
        assert!(matches!(err, RxMatchError::UnknownCandidate(_)));

        let err = session.resolve(7, "Parolex").unwrap_err();
        assert!(matches!(err, RxMatchError::LineNotFound(7)));
    }

    #[test]
    fn test_report_serializes() {
        let session = PrescriptionSession::from_text(&store(), "Augmentin\n", 0.7, 50);
        let report = session.report(Some("abc".into()));
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"catalogFingerprint\":\"abc\""));
        assert!(json.contains("\"status\":\"accepted\""));
        assert!(json.contains("\"accepted\":[\"Augmentin\"]"));
    }
}
