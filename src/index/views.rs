//! インデックスの読み取り専用ビュー
//!
//! 外部のRESTレイヤーや同期クライアントが読むJSONの形。

use super::{OntologyEntity, OntologyIndex, OntologyPoint};
use crate::error::{DboMapperError, Result};
use serde::Serialize;

pub const MODULE_NAME: &str = "dbo-mapper";
pub const ONTOLOGY_TYPE: &str = "Google Digital Buildings";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutView {
    pub module_name: String,
    pub module_version: String,
    pub ontology_type: String,
    pub num_entities: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub id: String,
    pub name: String,
    pub path: String,
    pub entity_type: String,
    pub num_points: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub dbo_field: String,
    pub original_name: String,
    pub addr: String,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_mapping: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
}

impl From<&OntologyPoint> for FieldView {
    fn from(p: &OntologyPoint) -> Self {
        let facets = p.has_facets().then(|| Facets {
            min: p.min_value,
            max: p.max_value,
            precision: p.precision,
        });
        Self {
            dbo_field: p.dbo_field.clone(),
            original_name: p.original_name.clone(),
            addr: p.address.clone(),
            confidence: p.confidence,
            units: p.units.clone(),
            enum_mapping: p.enum_mapping.clone(),
            facets,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFields {
    pub entity_id: String,
    pub entity_name: String,
    pub entity_type: String,
    pub fields: Vec<FieldView>,
}

impl From<&OntologyEntity> for EntityFields {
    fn from(e: &OntologyEntity) -> Self {
        Self {
            entity_id: e.id.clone(),
            entity_name: e.name.clone(),
            entity_type: e.entity_type.clone(),
            fields: e.points.iter().map(FieldView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub entity_id: String,
    pub entity_name: String,
    pub original_name: String,
    pub dbo_field: String,
    pub confidence: u8,
}

/// インデックス全体の書き出し用
#[derive(Debug, Clone, Serialize)]
pub struct IndexExport {
    pub about: AboutView,
    pub entities: Vec<EntitySummary>,
    pub mappings: Vec<Mapping>,
    pub fields: Vec<EntityFields>,
}

pub fn about(index: &OntologyIndex) -> AboutView {
    AboutView {
        module_name: MODULE_NAME.to_string(),
        module_version: env!("CARGO_PKG_VERSION").to_string(),
        ontology_type: ONTOLOGY_TYPE.to_string(),
        num_entities: index.num_entities(),
    }
}

pub fn entities(index: &OntologyIndex) -> Vec<EntitySummary> {
    index
        .entities()
        .map(|e| EntitySummary {
            id: e.id.clone(),
            name: e.name.clone(),
            path: e.path.clone(),
            entity_type: e.entity_type.clone(),
            num_points: e.points.len(),
        })
        .collect()
}

/// エンティティのフィールド一覧（未知のIDはエラー）
pub fn entity_fields(index: &OntologyIndex, id: &str) -> Result<EntityFields> {
    index
        .get_entity(id)
        .map(EntityFields::from)
        .ok_or_else(|| DboMapperError::EntityNotFound(id.to_string()))
}

/// 全ポイントの照合結果（エンティティ順 → ポイント順）
pub fn mappings(index: &OntologyIndex) -> Vec<Mapping> {
    index
        .entities()
        .flat_map(|e| {
            e.points.iter().map(move |p| Mapping {
                entity_id: e.id.clone(),
                entity_name: e.name.clone(),
                original_name: p.original_name.clone(),
                dbo_field: p.dbo_field.clone(),
                confidence: p.confidence,
            })
        })
        .collect()
}

pub fn export(index: &OntologyIndex) -> IndexExport {
    IndexExport {
        about: about(index),
        entities: entities(index),
        mappings: mappings(index),
        fields: index.entities().map(EntityFields::from).collect(),
    }
}
