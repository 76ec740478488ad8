//! 修正データファイル
//!
//! `[{"pointName": "...", "correctMatch": "...", "equipmentType": "AHU"}]` 形式。

use crate::error::{DboMapperError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ユーザーが送った1件の修正
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionRecord {
    pub point_name: String,
    pub correct_match: String,
    /// 省略時は EQUIPMENT
    #[serde(default = "default_equipment_type")]
    pub equipment_type: String,
    /// 誤っていた照合結果（分かれば）
    #[serde(default)]
    pub wrong_match: Option<String>,
}

fn default_equipment_type() -> String {
    dbo_mapper_common::DEFAULT_ENTITY_TYPE.to_string()
}

impl CorrectionRecord {
    pub fn new(point_name: &str, correct_match: &str, equipment_type: &str) -> Self {
        Self {
            point_name: point_name.to_string(),
            correct_match: correct_match.to_string(),
            equipment_type: equipment_type.to_string(),
            wrong_match: None,
        }
    }
}

/// 修正データを読み込み
pub fn load_corrections(path: &Path) -> Result<Vec<CorrectionRecord>> {
    if !path.exists() {
        return Err(DboMapperError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_corrections(&content)
        .map_err(|e| DboMapperError::InvalidCorrections(format!("{}: {}", path.display(), e)))
}

fn parse_corrections(content: &str) -> std::result::Result<Vec<CorrectionRecord>, String> {
    let records: Vec<CorrectionRecord> = serde_json::from_str(content).map_err(|e| e.to_string())?;

    if let Some(pos) = records
        .iter()
        .position(|r| r.point_name.trim().is_empty() || r.correct_match.trim().is_empty())
    {
        return Err(format!("{}件目: pointName と correctMatch は必須です", pos + 1));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let records = parse_corrections(
            r#"[{"pointName": "SAT", "correctMatch": "supply_air_temperature_sensor"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].equipment_type, "EQUIPMENT");
        assert!(records[0].wrong_match.is_none());
    }

    #[test]
    fn test_parse_with_wrong_match() {
        let records = parse_corrections(
            r#"[{"pointName": "Zone Temp", "correctMatch": "zone_air_temperature_sensor",
                 "equipmentType": "VAV", "wrongMatch": "zone_sensor"}]"#,
        )
        .unwrap();
        assert_eq!(records[0].equipment_type, "VAV");
        assert_eq!(records[0].wrong_match.as_deref(), Some("zone_sensor"));
    }

    #[test]
    fn test_parse_rejects_blank_fields() {
        let err = parse_corrections(r#"[{"pointName": " ", "correctMatch": "x"}]"#).unwrap_err();
        assert!(err.starts_with("1件目"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_corrections(Path::new("/nonexistent/corrections.json"));
        assert!(matches!(result, Err(DboMapperError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrections.json");
        std::fs::write(&path, "not json").unwrap();
        let result = load_corrections(&path);
        assert!(matches!(result, Err(DboMapperError::InvalidCorrections(_))));
    }
}
