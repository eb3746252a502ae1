//! 対話式確認モジュール
//!
//! 閾値未満で自動採用されなかった行について、上位候補を提示して
//! 人に選んでもらう。

use crate::error::Result;
use crate::prescription::PrescriptionSession;
use dialoguer::Select;

/// 選択肢の表示文字列
pub fn candidate_labels(session: &PrescriptionSession, index: usize) -> Vec<String> {
    let mut labels: Vec<String> = session
        .lines
        .get(index)
        .map(|line| {
            line.result
                .top_candidates
                .iter()
                .map(|c| format!("{} ({:.0}%)", c.name, c.score * 100.0))
                .collect()
        })
        .unwrap_or_default();
    labels.push("スキップ".to_string());
    labels
}

/// 要確認の行を順に確認する
///
/// # Returns
/// 確定させた行数
pub fn run_interactive_review(session: &mut PrescriptionSession) -> Result<usize> {
    let pending: Vec<usize> = session.pending().map(|l| l.index).collect();

    if pending.is_empty() {
        println!("✓ 確認が必要な薬品はありません");
        return Ok(0);
    }

    println!("💊 確認が必要な薬品: {}件", pending.len());
    println!("---\n");

    let mut confirmed = 0;
    for (count, &index) in pending.iter().enumerate() {
        let line = &session.lines[index];
        println!(
            "[{}/{}] 「{}」 (信頼度 {:.0}%)",
            count + 1,
            pending.len(),
            line.query,
            line.result.confidence * 100.0
        );

        let labels = candidate_labels(session, index);
        let skip = labels.len() - 1;
        let selection = Select::new()
            .with_prompt("候補を選択")
            .items(&labels)
            .default(0)
            .interact()?;

        if selection == skip {
            println!("  → スキップ\n");
            continue;
        }

        let name = session.lines[index].result.top_candidates[selection].name.clone();
        session.resolve(index, &name)?;
        confirmed += 1;
        println!("  → {}\n", name);
    }

    Ok(confirmed)
}
