//! 修正履歴による信頼度補正
//!
//! 同じパターンの修正が繰り返されるほど、そのパターンの照合結果の
//! 信頼度を引き上げる（1件あたり+5、最大+20）。

use dbo_mapper_common::Correction;
use std::collections::HashMap;
use tracing::debug;

const BOOST_PER_CORRECTION: usize = 5;
const MAX_BOOST: usize = 20;

/// 修正履歴と補正カウンタ
#[derive(Debug, Clone, Default)]
pub struct Corrector {
    corrections: Vec<Correction>,
    pattern_counts: HashMap<String, usize>,
}

/// 補正の統計情報
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectorStats {
    pub corrections: usize,
    pub patterns: usize,
}

impl std::fmt::Display for CorrectorStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Learned from {} corrections, {} patterns discovered",
            self.corrections, self.patterns
        )
    }
}

impl Corrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユーザー修正を記録
    pub fn record_correction(&mut self, original_name: &str, wrong_match: &str, correct_match: &str) {
        self.corrections
            .push(Correction::new(original_name, wrong_match, correct_match));

        let pattern = extract_pattern(original_name, correct_match);
        *self.pattern_counts.entry(pattern.clone()).or_insert(0) += 1;

        debug!(
            "Learned: '{}' -> '{}' (pattern: {})",
            original_name, correct_match, pattern
        );
    }

    /// 学習済みパターンに応じて信頼度を補正（副作用なし）
    pub fn adjust_confidence(&self, original_name: &str, proposed_match: &str, base_confidence: u8) -> u8 {
        let pattern = extract_pattern(original_name, proposed_match);
        let Some(&count) = self.pattern_counts.get(&pattern) else {
            return base_confidence;
        };

        let boost = (count * BOOST_PER_CORRECTION).min(MAX_BOOST);
        let adjusted = (base_confidence as usize + boost).min(100) as u8;

        if boost > 0 {
            debug!(
                "Boosting confidence: {} -> {} (learned from {} corrections)",
                base_confidence, adjusted, count
            );
        }

        adjusted
    }

    /// パターンの記録回数
    pub fn pattern_count(&self, pattern: &str) -> usize {
        self.pattern_counts.get(pattern).copied().unwrap_or(0)
    }

    /// 修正履歴のコピー
    pub fn corrections(&self) -> Vec<Correction> {
        self.corrections.clone()
    }

    pub fn stats(&self) -> CorrectorStats {
        CorrectorStats {
            corrections: self.corrections.len(),
            patterns: self.pattern_counts.len(),
        }
    }
}

/// 修正パターンのキーを求める
///
/// 既知の語の対応（temp→temperature 等）を優先し、
/// それ以外は双方の先頭3文字をつなぐ。
pub fn extract_pattern(original: &str, matched: &str) -> String {
    let orig_lower = original.to_lowercase();
    let match_lower = matched.to_lowercase();

    if match_lower.contains("temperature") && orig_lower.contains("temp") {
        return "temp->temperature".to_string();
    }
    if match_lower.contains("pressure") && orig_lower.contains("press") {
        return "press->pressure".to_string();
    }
    if match_lower.contains("setpoint") && orig_lower.contains("sp") {
        return "sp->setpoint".to_string();
    }

    format!("{}->{}", prefix3(&orig_lower), prefix3(&match_lower))
}

fn prefix3(text: &str) -> String {
    text.chars().take(3).collect()
}
