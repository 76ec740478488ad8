//! 照合・学習で共有される型定義
//!
//! - MatchResult: ルール照合／学習器の出力
//! - Correction: ユーザー修正の記録
//! - TrainingExample: 学習器の教師データ
//! - PointDescriptor: 外部ポイントソースが供給するポイント情報

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 信頼度の上限
pub const MAX_CONFIDENCE: i32 = 100;

/// 照合結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub dbo_field: String,

    /// 0〜100
    pub confidence: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
}

impl MatchResult {
    /// スコア計算途中の値を受け取り、0〜100にクランプして生成
    pub fn new(dbo_field: impl Into<String>, confidence: i32) -> Self {
        Self {
            dbo_field: dbo_field.into(),
            confidence: clamp_confidence(confidence),
            point_type: None,
            measurement: None,
        }
    }
}

/// 信頼度を0〜100に丸める
pub fn clamp_confidence(value: i32) -> u8 {
    value.clamp(0, MAX_CONFIDENCE) as u8
}

/// ユーザー修正（記録後は不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub original_name: String,
    pub wrong_match: String,
    pub correct_match: String,
    pub timestamp: DateTime<Utc>,
}

impl Correction {
    pub fn new(original_name: &str, wrong_match: &str, correct_match: &str) -> Self {
        Self {
            original_name: original_name.to_string(),
            wrong_match: wrong_match.to_string(),
            correct_match: correct_match.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// 学習データ（記録後は不変、equipment_typeは空文字可）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingExample {
    pub point_name: String,
    #[serde(default)]
    pub equipment_type: String,
    pub dbo_field: String,
    pub timestamp: DateTime<Utc>,
}

impl TrainingExample {
    pub fn new(point_name: &str, equipment_type: &str, dbo_field: &str) -> Self {
        Self {
            point_name: point_name.to_string(),
            equipment_type: equipment_type.to_string(),
            dbo_field: dbo_field.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// 学習器の予測結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub dbo_field: Option<String>,
    pub confidence: u8,
    pub reasoning: String,
}

impl Prediction {
    /// 予測不能（フィールドなし・信頼度0）
    pub fn none(reasoning: impl Into<String>) -> Self {
        Self {
            dbo_field: None,
            confidence: 0,
            reasoning: reasoning.into(),
        }
    }
}

/// ポイント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Boolean,
    #[default]
    Numeric,
    Enum,
    /// 文字列など照合対象外の種別
    #[serde(other)]
    Unsupported,
}

impl PointKind {
    pub fn is_boolean(&self) -> bool {
        matches!(self, PointKind::Boolean)
    }
}

/// ポイントが属する機器
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentRef {
    /// 機器のスロットパス（エンティティIDの元）
    pub path: String,
    pub display_name: String,
}

/// 外部ポイントソースが供給するポイント情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDescriptor {
    #[serde(default)]
    pub name: String,

    /// 欠けていれば空文字（索引時に失敗として数える）
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub units: Option<String>,

    #[serde(default)]
    pub kind: PointKind,

    #[serde(default)]
    pub equipment: EquipmentRef,

    /// ポイントのスロットパス
    #[serde(default)]
    pub path: String,

    /// 列挙値の範囲（序数, タグ）
    #[serde(default)]
    pub enum_range: Option<Vec<(i32, String)>>,

    #[serde(default)]
    pub min_value: Option<f64>,

    #[serde(default)]
    pub max_value: Option<f64>,

    #[serde(default)]
    pub precision: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_clamps_confidence() {
        assert_eq!(MatchResult::new("zone_sensor", 130).confidence, 100);
        assert_eq!(MatchResult::new("zone_sensor", -5).confidence, 0);
        assert_eq!(MatchResult::new("zone_sensor", 65).confidence, 65);
    }

    #[test]
    fn test_prediction_none() {
        let p = Prediction::none("Model not trained");
        assert!(p.dbo_field.is_none());
        assert_eq!(p.confidence, 0);
        assert_eq!(p.reasoning, "Model not trained");
    }

    #[test]
    fn test_point_descriptor_from_json() {
        let json = r#"{
            "displayName": "Zone Temp",
            "units": "°F",
            "kind": "numeric",
            "equipment": { "path": "/Drivers/VAV_1", "displayName": "VAV-1" }
        }"#;
        let point: PointDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(point.display_name, "Zone Temp");
        assert_eq!(point.units.as_deref(), Some("°F"));
        assert_eq!(point.kind, PointKind::Numeric);
        assert_eq!(point.equipment.display_name, "VAV-1");
        assert!(point.enum_range.is_none());
    }

    #[test]
    fn test_point_kind_default_is_numeric() {
        let point: PointDescriptor = serde_json::from_str(r#"{"displayName":"x"}"#).unwrap();
        assert_eq!(point.kind, PointKind::Numeric);
        assert!(!point.kind.is_boolean());
    }

    #[test]
    fn test_unknown_point_kind_is_unsupported() {
        let point: PointDescriptor =
            serde_json::from_str(r#"{"displayName":"Label","kind":"string"}"#).unwrap();
        assert_eq!(point.kind, PointKind::Unsupported);

        let point: PointDescriptor = serde_json::from_str(r#"{"kind":"enum"}"#).unwrap();
        assert_eq!(point.kind, PointKind::Enum);
        assert!(point.display_name.is_empty());
    }
}
