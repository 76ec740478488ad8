//! 学習モジュール
//!
//! - corrector: 修正回数に応じた信頼度補正
//! - features: 21次元の特徴量抽出
//! - knn: k近傍分類器
//! - learner: 教師データの蓄積・学習・予測

pub mod corrector;
pub mod features;
pub mod knn;
pub mod learner;

pub use corrector::{Corrector, CorrectorStats};
pub use features::{extract_features, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use learner::{LearnedModel, LearnerStats, StatisticalLearner, ML_CONFIDENCE};
