//! ルール照合と学習器の結果の選択
//!
//! 学習器の信頼度がルール照合より厳密に高い場合のみ学習器を採用する。
//! 同点はルール照合。

use crate::learning::StatisticalLearner;
use crate::matcher::RuleMatcher;
use dbo_mapper_common::MatchResult;
use tracing::debug;

/// 採用した結果の出所
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Rule,
    Learned,
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::Rule => write!(f, "rule"),
            MatchSource::Learned => write!(f, "ml"),
        }
    }
}

/// 選択結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub result: MatchResult,
    pub source: MatchSource,
    /// 比較に使ったルール照合の結果
    pub rule_result: MatchResult,
}

/// ルール照合と学習器を仲裁する
#[derive(Debug, Clone)]
pub struct Arbitrator {
    matcher: RuleMatcher,
}

impl Arbitrator {
    pub fn new(matcher: RuleMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    /// ポイントの最終的な照合結果を返す
    pub fn resolve(
        &self,
        point_name: &str,
        units: Option<&str>,
        is_boolean: bool,
        equipment_type: &str,
        learner: &StatisticalLearner,
    ) -> MatchResult {
        self.resolve_detailed(point_name, units, is_boolean, equipment_type, learner)
            .result
    }

    /// 出所つきで照合結果を返す
    pub fn resolve_detailed(
        &self,
        point_name: &str,
        units: Option<&str>,
        is_boolean: bool,
        equipment_type: &str,
        learner: &StatisticalLearner,
    ) -> Resolution {
        let rule = self.matcher.match_point(point_name, units, is_boolean);

        if learner.is_ready() {
            let prediction = learner.predict(point_name, equipment_type);
            if let Some(field) = prediction.dbo_field {
                if prediction.confidence > rule.confidence {
                    debug!(
                        "ML prediction wins: {} -> {} (ML:{}% vs Fuzzy:{}%)",
                        point_name, field, prediction.confidence, rule.confidence
                    );
                    return Resolution {
                        result: MatchResult::new(field, prediction.confidence as i32),
                        source: MatchSource::Learned,
                        rule_result: rule,
                    };
                }
            }
        }

        Resolution {
            result: rule.clone(),
            source: MatchSource::Rule,
            rule_result: rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbo_mapper_common::Vocabulary;
    use std::sync::Arc;

    fn arbitrator() -> Arbitrator {
        Arbitrator::new(RuleMatcher::new(Arc::new(Vocabulary::standard())))
    }

    fn trained_learner() -> StatisticalLearner {
        let mut learner = StatisticalLearner::new();
        for (name, equip, field) in [
            ("Zone Temp", "VAV", "zone_air_temperature_sensor"),
            ("Space Temp", "VAV", "zone_air_temperature_sensor"),
            ("Room Temp", "VAV", "zone_air_temperature_sensor"),
            ("Zone Temp SP", "VAV", "zone_air_temperature_setpoint"),
            ("Damper Position", "VAV", "supply_air_damper_command"),
        ] {
            learner.add_example(name, equip, field);
        }
        assert!(learner.train());
        learner
    }

    #[test]
    fn test_untrained_learner_uses_rule() {
        let resolution =
            arbitrator().resolve_detailed("Zone Temp SP", None, false, "VAV", &StatisticalLearner::new());
        assert_eq!(resolution.source, MatchSource::Rule);
        assert_eq!(resolution.result.dbo_field, "zone_setpoint");
    }

    #[test]
    fn test_learner_wins_when_more_confident() {
        // ルール照合は 45、学習器は 75
        let resolution =
            arbitrator().resolve_detailed("Zone Temp SP", None, false, "VAV", &trained_learner());
        assert_eq!(resolution.source, MatchSource::Learned);
        assert_eq!(resolution.result.confidence, 75);
        assert_eq!(resolution.rule_result.confidence, 45);
    }

    #[test]
    fn test_rule_wins_when_more_confident() {
        // 略語は 90
        let result = arbitrator().resolve("DAT", None, false, "AHU", &trained_learner());
        assert_eq!(result.dbo_field, "discharge_air_temperature_sensor");
        assert_eq!(result.confidence, 90);
    }

    #[test]
    fn test_tie_favors_rule() {
        // 50 + 15(sensor) + 10(fan) = 75 と学習器の75が同点
        let resolution =
            arbitrator().resolve_detailed("Fan Sensor", None, false, "VAV", &trained_learner());
        assert_eq!(resolution.rule_result.confidence, 75);
        assert_eq!(resolution.source, MatchSource::Rule);
        assert_eq!(resolution.result.dbo_field, "fan_sensor");
    }
}
