//! dbo-mapper
//!
//! ビル設備のポイント名を Digital Buildings Ontology (DBO) のフィールド名に
//! 照合し、ユーザー修正から学習する。
//!
//! - matcher: 語彙によるルールベース照合
//! - learning: 修正による信頼度補正とk近傍学習
//! - arbitrator: ルール照合と学習器の選択
//! - index: エンティティ/ポイントのインデックスとJSONビュー
//! - scanner: ポイントソース
//! - service: 再構築・修正受付・学習のまとめ役

pub mod arbitrator;
pub mod cli;
pub mod config;
pub mod corrections;
pub mod error;
pub mod index;
pub mod learning;
pub mod matcher;
pub mod scanner;
pub mod service;

pub use arbitrator::{Arbitrator, MatchSource, Resolution};
pub use config::Config;
pub use error::{DboMapperError, Result};
pub use index::{OntologyEntity, OntologyIndex, OntologyPoint};
pub use learning::{Corrector, StatisticalLearner};
pub use matcher::RuleMatcher;
pub use scanner::{JsonPointSource, PointBatch, PointProvider};
pub use service::{LearningStats, OntologyService, RebuildStats};
