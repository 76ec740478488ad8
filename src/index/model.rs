//! インデックスに格納するエンティティとポイント

use serde::{Deserialize, Serialize};

/// DBOフィールドに照合されたポイント
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyPoint {
    pub dbo_field: String,
    pub original_name: String,
    /// エンティティからの相対アドレス
    pub address: String,
    #[serde(default)]
    pub units: Option<String>,
    /// "0=Off,1=On" 形式
    #[serde(default)]
    pub enum_mapping: Option<String>,
    pub confidence: u8,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub precision: Option<u32>,
}

impl OntologyPoint {
    pub fn has_facets(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some() || self.precision.is_some()
    }
}

/// 機器（ポイントの所有者）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyEntity {
    pub id: String,
    pub name: String,
    pub path: String,
    /// AHU, VAV, CHWS など
    pub entity_type: String,
    /// 走査順
    #[serde(default)]
    pub points: Vec<OntologyPoint>,
}

impl OntologyEntity {
    pub fn new(id: &str, name: &str, path: &str, entity_type: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            entity_type: entity_type.to_string(),
            points: Vec::new(),
        }
    }

    pub fn add_point(&mut self, point: OntologyPoint) {
        self.points.push(point);
    }

    /// アドレスでポイントを検索
    pub fn get_point(&self, address: &str) -> Option<&OntologyPoint> {
        self.points.iter().find(|p| p.address == address)
    }
}
