//! インデックス再構築テスト
//!
//! ポイント一覧JSONからの再構築・最低信頼度・除外・修正による補正を検証

use dbo_mapper::config::Config;
use dbo_mapper::index::views;
use dbo_mapper::scanner::address::{entity_id, BOOLEAN_MAPPING};
use dbo_mapper::scanner::JsonPointSource;
use dbo_mapper::service::OntologyService;
use dbo_mapper_common::Vocabulary;
use std::sync::Arc;
use tempfile::tempdir;

const POINTS_JSON: &str = r#"[
    {"name": "DAT", "displayName": "DAT", "units": "°F", "path": "/Drivers/AHU_1/points/DAT",
     "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}},
    {"name": "FanRunState", "displayName": "Fan Run State", "kind": "boolean",
     "path": "/Drivers/AHU_1/points/Fan$20Run$20State",
     "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}},
    {"name": "RoomLevel", "displayName": "Room Level", "units": "null",
     "path": "/Drivers/AHU_1/points/RoomLevel",
     "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}},
    {"name": "Broken", "displayName": "", "path": "/Drivers/AHU_1/points/Broken",
     "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}},
    {"name": "DischargeTemp", "displayName": "Discharge Air Temperature Sensor", "units": "°F",
     "path": "/Drivers/VAV_2/points/DischargeTemp",
     "minValue": 40.0, "maxValue": 120.0, "precision": 1,
     "equipment": {"path": "/Drivers/VAV_2", "displayName": "VAV-2"}},
    {"name": "OccMode", "displayName": "Occ Mode", "kind": "enum",
     "path": "/Drivers/VAV_2/points/OccMode", "enumRange": [[0, "Unocc"], [1, "Occ"]],
     "equipment": {"path": "/Drivers/VAV_2", "displayName": "VAV-2"}},
    {"name": "Status", "displayName": "Status", "kind": "boolean",
     "path": "/Services/UserService/Status",
     "equipment": {"path": "/Services/UserService", "displayName": "UserService"}},
    {"name": "OrphanTemp", "displayName": "Orphan Temp"}
]"#;

fn write_points() -> tempfile::TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("points.json"), POINTS_JSON).unwrap();
    dir
}

fn service_with(config: Config) -> OntologyService {
    OntologyService::new(Arc::new(Vocabulary::standard()), config)
}

/// 既定の設定で再構築
#[test]
fn test_rebuild_from_folder() {
    let dir = write_points();
    let service = service_with(Config::default());

    let stats = service.rebuild_index(&JsonPointSource::new(dir.path())).unwrap();
    assert_eq!(stats.points_scanned, 8);
    assert_eq!(stats.points_matched, 4);
    assert_eq!(stats.low_confidence, 1);
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.entities, 2);

    let index = service.index();
    let types: Vec<&str> = index.entities().map(|e| e.entity_type.as_str()).collect();
    assert_eq!(types, vec!["AHU", "VAV"]);
}

/// エンティティとポイントの内容
#[test]
fn test_entity_points() {
    let dir = write_points();
    let service = service_with(Config::default());
    service.rebuild_index(&JsonPointSource::new(dir.path())).unwrap();
    let index = service.index();

    let ahu = index.get_entity(&entity_id("/Drivers/AHU_1")).expect("AHU-1");
    assert_eq!(ahu.name, "AHU-1");
    assert_eq!(ahu.points.len(), 2);

    let dat = ahu.get_point("points.DAT").expect("DAT");
    assert_eq!(dat.dbo_field, "discharge_air_temperature_sensor");
    assert_eq!(dat.confidence, 90);
    assert_eq!(dat.units.as_deref(), Some("°F"));
    assert!(dat.enum_mapping.is_none());

    let fan = ahu.get_point("points.FanRunState").expect("Fan Run State");
    assert_eq!(fan.dbo_field, "fan_status");
    assert_eq!(fan.confidence, 50);
    assert_eq!(fan.enum_mapping.as_deref(), Some(BOOLEAN_MAPPING));

    let vav = index.get_entity(&entity_id("/Drivers/VAV_2")).expect("VAV-2");
    let occ = vav.get_point("points.OccMode").expect("Occ Mode");
    assert_eq!(occ.dbo_field, "mode");
    assert_eq!(occ.confidence, 65);
    assert_eq!(occ.enum_mapping.as_deref(), Some("0=Unocc,1=Occ"));

    let temp = vav.get_point("points.DischargeTemp").expect("Discharge Temp");
    assert_eq!(temp.confidence, 100);
    assert_eq!(temp.min_value, Some(40.0));
    assert_eq!(temp.precision, Some(1));
}

/// 最低信頼度を上げると採用が減る
#[test]
fn test_min_confidence_cutoff() {
    let dir = write_points();
    let config = Config {
        min_confidence: 95,
        ..Config::default()
    };
    let service = service_with(config);

    let stats = service.rebuild_index(&JsonPointSource::new(dir.path())).unwrap();
    assert_eq!(stats.points_matched, 1);
    assert_eq!(stats.low_confidence, 4);

    let mappings = views::mappings(&service.index());
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].dbo_field, "discharge_air_temperature_sensor");
    assert_eq!(mappings[0].entity_name, "VAV-2");
}

/// 繰り返しの修正で低信頼度のポイントが採用される
#[test]
fn test_corrections_boost_into_index() {
    let dir = write_points();
    let service = service_with(Config::default());
    let source = JsonPointSource::new(dir.path());

    service.rebuild_index(&source).unwrap();
    let ahu_id = entity_id("/Drivers/AHU_1");
    assert!(service.index().get_entity(&ahu_id).unwrap().get_point("points.RoomLevel").is_none());

    // "Room Level" の照合結果は sensor (40%)。2回で +10
    service.add_correction("Room Level", "sensor", "AHU", Some("level_sensor"));
    service.add_correction("Room Level", "sensor", "AHU", Some("level_sensor"));

    let stats = service.rebuild_index(&source).unwrap();
    assert_eq!(stats.points_matched, 5);
    let index = service.index();
    let room = index.get_entity(&ahu_id).unwrap().get_point("points.RoomLevel").unwrap();
    assert_eq!(room.confidence, 50);
    assert!(room.units.is_none());
}

/// 再構築中も古いスナップショットは変わらない
#[test]
fn test_snapshot_survives_rebuild() {
    let dir = write_points();
    let service = service_with(Config::default());
    let source = JsonPointSource::new(dir.path());

    service.rebuild_index(&source).unwrap();
    let first = service.index();

    service.index_points(&[], |_| {});
    assert_eq!(first.num_entities(), 2);
    assert!(service.index().is_empty());
}

/// 書き出しJSONの形
#[test]
fn test_export_json() {
    let dir = write_points();
    let service = service_with(Config::default());
    service.rebuild_index(&JsonPointSource::new(dir.path())).unwrap();

    let json = serde_json::to_value(service.export()).unwrap();
    assert_eq!(json["about"]["numEntities"], 2);
    assert_eq!(json["about"]["ontologyType"], "Google Digital Buildings");
    assert_eq!(json["entities"].as_array().unwrap().len(), 2);
    assert_eq!(json["mappings"].as_array().unwrap().len(), 4);
    assert_eq!(json["fields"][1]["fields"][0]["facets"]["max"], 120.0);
}

/// 形式の合わない要素や照合対象外の種別があっても再構築は続く
#[test]
fn test_rebuild_tolerates_malformed_points() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("points.json"),
        r#"[
            {"name": "DAT", "displayName": "DAT", "units": "°F", "path": "/Drivers/AHU_1/points/DAT",
             "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}},
            {"name": "Label", "displayName": "Label", "kind": "string",
             "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}},
            {"name": "NoName", "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}},
            {"name": "BadUnits", "displayName": "Zone Temp", "units": 5,
             "equipment": {"path": "/Drivers/AHU_1", "displayName": "AHU-1"}}
        ]"#,
    )
    .unwrap();
    let service = service_with(Config::default());

    let stats = service.rebuild_index(&JsonPointSource::new(dir.path())).unwrap();
    assert_eq!(stats.points_scanned, 4);
    assert_eq!(stats.points_matched, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.entities, 1);

    let index = service.index();
    let ahu = index.get_entity(&entity_id("/Drivers/AHU_1")).expect("AHU-1");
    assert_eq!(ahu.points.len(), 1);
    assert!(ahu.get_point("points.DAT").is_some());
}
