//! DBO Mapper Common Library
//!
//! ルール照合・学習器・CLIで共有される型と語彙ライブラリ

pub mod types;
pub mod vocabulary;
pub mod tokenizer;
pub mod error;

pub use types::{
    Correction, EquipmentRef, MatchResult, PointDescriptor, PointKind, Prediction,
    TrainingExample,
};
pub use vocabulary::{Abbreviation, EntityTypeRule, Vocabulary, DEFAULT_ENTITY_TYPE};
pub use tokenizer::tokenize;
pub use error::{Error, Result};
