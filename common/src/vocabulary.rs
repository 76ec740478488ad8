//! DBO語彙ライブラリ
//!
//! ポイント種別・計測量・記述子・部品・略語・機器種別のキーワード表。
//! 起動時に一度だけ構築し、以後は読み取り専用の値として照合器へ渡す。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 機器種別が判定できなかった場合の既定値
pub const DEFAULT_ENTITY_TYPE: &str = "EQUIPMENT";

/// 機器種別キーワード（部分一致、宣言順で最初の一致を採用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeRule {
    pub keyword: String,
    pub code: String,
}

/// 略語展開
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abbreviation {
    pub short: String,
    pub expansion: String,
}

/// 語彙定義
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    /// ポイント種別（フィールド名の末尾）
    #[serde(default)]
    point_types: HashSet<String>,
    /// 計測量
    #[serde(default)]
    measurements: HashSet<String>,
    /// 計測量の修飾語（照合ではスコアしない）
    #[serde(default)]
    measurement_descriptors: HashSet<String>,
    /// 位置・機能の記述子
    #[serde(default)]
    descriptors: HashSet<String>,
    /// 物理部品
    #[serde(default)]
    components: HashSet<String>,
    /// 集計
    #[serde(default)]
    aggregations: HashSet<String>,
    /// 機器種別（順序付き）
    #[serde(default)]
    entity_types: Vec<EntityTypeRule>,
    /// HVAC略語（順序付き）
    #[serde(default)]
    abbreviations: Vec<Abbreviation>,
}

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Vocabulary {
    /// 標準のDBO語彙
    pub fn standard() -> Self {
        let entity_types = [
            ("ahu", "AHU"),
            ("rtu", "RTU"),
            ("vav", "VAV"),
            ("fcu", "FCU"),
            ("chws", "CHWS"),
            ("hws", "HWS"),
            ("boiler", "BLR"),
            ("chiller", "CH"),
            ("cooling", "CT"),
            ("tower", "CT"),
            ("fan", "FAN"),
            ("pump", "PMP"),
        ]
        .iter()
        .map(|(keyword, code)| EntityTypeRule {
            keyword: keyword.to_string(),
            code: code.to_string(),
        })
        .collect();

        let abbreviations = [
            ("dat", "discharge_air_temperature"),
            ("rat", "return_air_temperature"),
            ("mat", "mixed_air_temperature"),
            ("oat", "outside_air_temperature"),
            ("sat", "supply_air_temperature"),
            ("chwst", "chilled_water_supply_temperature"),
            ("chwrt", "chilled_water_return_temperature"),
            ("hwst", "hot_water_supply_temperature"),
            ("hwrt", "hot_water_return_temperature"),
            ("znt", "zone_air_temperature"),
            ("sp", "setpoint"),
            ("cmd", "command"),
            ("sts", "status"),
            ("dpr", "damper"),
            ("vlv", "valve"),
            ("sf", "supply_fan"),
            ("rf", "return_fan"),
            ("ef", "exhaust_fan"),
        ]
        .iter()
        .map(|(short, expansion)| Abbreviation {
            short: short.to_string(),
            expansion: expansion.to_string(),
        })
        .collect();

        Self {
            point_types: word_set(&[
                "sensor", "setpoint", "command", "status", "alarm", "count",
                "accumulator", "mode", "enable",
            ]),
            measurements: word_set(&[
                "temperature", "pressure", "flowrate", "flowvolume", "power", "current",
                "voltage", "speed", "frequency", "percentage", "concentration",
            ]),
            measurement_descriptors: word_set(&[
                "differential", "relative", "static", "total", "effective",
            ]),
            descriptors: word_set(&[
                "discharge", "supply", "return", "exhaust", "outside", "zone", "mixed",
                "entering", "leaving", "primary", "secondary", "chilled", "hot",
                "condensing", "evaporator", "cooling", "heating", "building", "space",
            ]),
            components: word_set(&[
                "air", "water", "fan", "pump", "valve", "damper", "filter", "coil",
                "compressor", "economizer",
            ]),
            aggregations: word_set(&["min", "max", "average", "mean"]),
            entity_types,
            abbreviations,
        }
    }

    /// JSON文字列から読み込み（差し替え用の語彙）
    ///
    /// ポイント種別が空の語彙は `Error::Config`。
    pub fn from_json(json: &str) -> Result<Self> {
        let vocabulary: Self = serde_json::from_str(json)?;
        if vocabulary.point_types.is_empty() {
            return Err(Error::Config("vocabulary has no point types".to_string()));
        }
        Ok(vocabulary)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn is_point_type(&self, word: &str) -> bool {
        self.point_types.contains(&word.to_lowercase())
    }

    pub fn is_measurement(&self, word: &str) -> bool {
        self.measurements.contains(&word.to_lowercase())
    }

    pub fn is_measurement_descriptor(&self, word: &str) -> bool {
        self.measurement_descriptors.contains(&word.to_lowercase())
    }

    pub fn is_descriptor(&self, word: &str) -> bool {
        self.descriptors.contains(&word.to_lowercase())
    }

    pub fn is_component(&self, word: &str) -> bool {
        self.components.contains(&word.to_lowercase())
    }

    pub fn is_aggregation(&self, word: &str) -> bool {
        self.aggregations.contains(&word.to_lowercase())
    }

    pub fn point_types(&self) -> &HashSet<String> {
        &self.point_types
    }

    pub fn measurements(&self) -> &HashSet<String> {
        &self.measurements
    }

    pub fn descriptors(&self) -> &HashSet<String> {
        &self.descriptors
    }

    /// 略語を展開（大文字小文字を区別しない完全一致）
    pub fn expand_abbreviation(&self, word: &str) -> Option<&str> {
        let lower = word.to_lowercase();
        self.abbreviations
            .iter()
            .find(|a| a.short == lower)
            .map(|a| a.expansion.as_str())
    }

    /// 宣言順の略語一覧
    pub fn abbreviations(&self) -> impl Iterator<Item = &Abbreviation> {
        self.abbreviations.iter()
    }

    /// 機器の表示名から機器種別を推定
    ///
    /// 宣言順にキーワードを部分一致で検査し、最初の一致を返す。
    /// 一致しなければ `EQUIPMENT`。
    pub fn infer_entity_type(&self, name: &str) -> &str {
        let lower = name.to_lowercase();
        self.entity_types
            .iter()
            .find(|rule| lower.contains(rule.keyword.as_str()))
            .map(|rule| rule.code.as_str())
            .unwrap_or(DEFAULT_ENTITY_TYPE)
    }
}
