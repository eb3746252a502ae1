//! 薬品名照合モジュール
//!
//! OCRで読み取った（欠け・誤読を含む）文字列をカタログ全件と比較し、
//! スコア順の候補と信頼度を返す。
//!
//! ## 処理フロー
//! 1. クエリと各エントリ名を正規化（トリム＋小文字化）
//! 2. 全エントリの類似度を計算
//! 3. スコア降順に安定ソート（同点はカタログ順）
//! 4. 最上位が閾値以上なら `best_match` に採用

use crate::catalog::CatalogStore;
use crate::types::{CatalogEntry, MatchCandidate, MatchResult};
use std::cmp::Ordering;
use tracing::debug;

/// 自動採用のデフォルト閾値
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// 返却する候補数
pub const TOP_CANDIDATES: usize = 5;

/// 部分一致時のスコア（完全一致より下、編集距離より上）
pub const SUBSTRING_SCORE: f64 = 0.9;

/// カタログストアに対して照合する
///
/// 呼び出し時点のスナップショットに対して照合するため、
/// 並行してカタログが差し替えられても結果は一貫する。
pub fn find_best_match(store: &CatalogStore, query: &str, threshold: f64) -> MatchResult {
    let snapshot = store.all();
    find_best_match_in(&snapshot, query, threshold)
}

/// エントリ列に対して照合する
///
/// # Arguments
/// * `entries` - カタログのエントリ列
/// * `query` - OCR結果のテキスト
/// * `threshold` - 自動採用の閾値（範囲外でもエラーにしない）
pub fn find_best_match_in(entries: &[CatalogEntry], query: &str, threshold: f64) -> MatchResult {
    if entries.is_empty() {
        debug!(query, "catalog is empty");
        return MatchResult::empty();
    }

    let normalized_query = normalize(query);

    let mut scored: Vec<(&CatalogEntry, f64)> = entries
        .iter()
        .map(|entry| (entry, similarity(&normalized_query, &normalize(&entry.name))))
        .collect();

    // sort_by は安定ソート
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let (confidence, best_match) = match scored.first() {
        Some((entry, score)) => {
            let accepted = (*score >= threshold).then(|| entry.name.clone());
            (*score, accepted)
        }
        None => (0.0, None),
    };

    let top_candidates = scored
        .iter()
        .take(TOP_CANDIDATES)
        .map(|(entry, score)| MatchCandidate {
            name: entry.name.clone(),
            score: *score,
        })
        .collect();

    debug!(
        query,
        confidence,
        threshold,
        accepted = best_match.is_some(),
        "match computed"
    );

    MatchResult {
        best_match,
        confidence,
        top_candidates,
    }
}

/// 比較用の正規化（表示名には影響しない）
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 類似度を計算
///
/// 安い判定から順に:
/// 1. 完全一致 → 1.0
/// 2. どちらかが空 → 0.0
/// 3. 一方が他方を含む → 0.9（OCRの欠け・はみ出し）
/// 4. それ以外は編集距離ベース `(max_len - distance) / max_len`
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.contains(b) || b.contains(a) {
        return SUBSTRING_SCORE;
    }

    let distance = levenshtein_distance(a, b);
    let max_len = a.chars().count().max(b.chars().count());

    (max_len - distance) as f64 / max_len as f64
}

/// レーベンシュタイン距離を計算
///
/// 打ち切りなしで全表を作る。薬品名は短いので問題にならない。
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}
