//! ルールベース照合
//!
//! ポイント名を語彙ライブラリと照合し、DBOフィールド名と信頼度を返す。
//!
//! ## スコア
//! - 基準 50
//! - ポイント種別 +15 / 計測量 +15 / 記述子 +5（毎回） / 部品 +10
//! - ポイント種別を推定した場合 -10
//! - 単位から計測量を推定できた場合 +10
//! - 単位と計測量の整合 +10、不整合 -15

mod types;
pub mod units;

pub use types::TokenClasses;

use dbo_mapper_common::{tokenize, MatchResult, Vocabulary};
use std::sync::Arc;

const BASE_CONFIDENCE: i32 = 50;
const ABBREVIATION_CONFIDENCE: i32 = 90;

/// ルールベース照合器
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    vocabulary: Arc<Vocabulary>,
}

impl RuleMatcher {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// ポイント名をDBOフィールドに照合する
    ///
    /// 失敗しない。根拠が乏しい場合は信頼度が下がるだけ。
    ///
    /// # Arguments
    /// * `point_name` - ポイントの表示名
    /// * `units` - 単位（なければ None）
    /// * `is_boolean` - 2値ポイントか
    pub fn match_point(&self, point_name: &str, units: Option<&str>, is_boolean: bool) -> MatchResult {
        // 名前全体が既知の略語なら即決（単位チェックもしない）
        if let Some(expanded) = self.vocabulary.expand_abbreviation(point_name) {
            return MatchResult::new(format!("{}_sensor", expanded), ABBREVIATION_CONFIDENCE);
        }

        let tokens = tokenize(point_name);
        let (mut classes, mut confidence) = self.classify_tokens(&tokens);

        let point_type = match classes.point_type.clone() {
            Some(point_type) => point_type,
            None => {
                confidence -= 10;
                infer_point_type(point_name, is_boolean).to_string()
            }
        };

        if classes.measurement.is_none() {
            if let Some(inferred) = units.and_then(units::infer_measurement) {
                classes.measurement = Some(inferred.to_string());
                confidence += 10;
            }
        }

        if let (Some(measurement), Some(units)) = (classes.measurement.as_deref(), units) {
            if units::units_consistent(units, measurement) {
                confidence += 10;
            } else {
                confidence -= 15;
            }
        }

        let mut result = MatchResult::new(classes.compose_field(&point_type), confidence);
        result.point_type = Some(point_type);
        result.measurement = classes.measurement;
        result
    }

    /// トークンを左から分類する
    ///
    /// 優先順: ポイント種別 → 計測量 → 記述子 → 部品。
    /// 先のカテゴリに分類されたトークンは後のカテゴリで再検査しない。
    pub fn classify_tokens(&self, tokens: &[String]) -> (TokenClasses, i32) {
        let mut classes = TokenClasses::default();
        let mut confidence = BASE_CONFIDENCE;

        for token in tokens {
            let lower = token.to_lowercase();

            if classes.point_type.is_none() && self.vocabulary.is_point_type(&lower) {
                classes.point_type = Some(lower);
                confidence += 15;
                continue;
            }

            if classes.measurement.is_none() && self.vocabulary.is_measurement(&lower) {
                classes.measurement = Some(lower);
                confidence += 15;
                continue;
            }

            if self.vocabulary.is_descriptor(&lower) {
                classes.descriptors.push(lower);
                confidence += 5;
                continue;
            }

            if classes.component.is_none() && self.vocabulary.is_component(&lower) {
                classes.component = Some(lower);
                confidence += 10;
            }
        }

        (classes, confidence)
    }
}

/// 名前の部分一致からポイント種別を推定
fn infer_point_type(point_name: &str, is_boolean: bool) -> &'static str {
    let lower = point_name.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if is_boolean {
        if has(&["status", "state"]) {
            return "status";
        }
        if has(&["cmd", "command"]) {
            return "command";
        }
        if has(&["enable"]) {
            return "enable";
        }
        return "status";
    }

    if has(&["sp", "setpoint", "set"]) {
        return "setpoint";
    }
    if has(&["alarm", "alert"]) {
        return "alarm";
    }

    "sensor"
}
