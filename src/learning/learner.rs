//! 統計的学習器
//!
//! ユーザー修正を教師データとして蓄積し、k近傍モデルを学習する。
//! 学習のたびに新しいモデルを作って丸ごと差し替えるので、
//! 予測側が学習途中のモデルを見ることはない。

use super::features::{extract_features, FeatureVector};
use super::knn::KnnClassifier;
use dbo_mapper_common::{Prediction, TrainingExample};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_MIN_EXAMPLES: usize = 5;
pub const DEFAULT_NEIGHBORS: usize = 5;

/// 予測時の固定信頼度（近傍の一致度からは算出しない）
pub const ML_CONFIDENCE: u8 = 75;

/// 学習済みモデルと、学習時点のラベル→フィールド対応
#[derive(Debug, Clone)]
pub struct LearnedModel {
    classifier: KnnClassifier,
    fields: Vec<String>,
}

impl LearnedModel {
    pub fn num_examples(&self) -> usize {
        self.classifier.len()
    }

    pub fn num_classes(&self) -> usize {
        self.fields.len()
    }

    pub fn k(&self) -> usize {
        self.classifier.k()
    }

    /// ラベルからDBOフィールドへ
    pub fn field_for_label(&self, label: usize) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    fn predict_field(&self, features: &FeatureVector) -> crate::error::Result<Option<&str>> {
        let label = self.classifier.predict(features)?;
        Ok(self.field_for_label(label))
    }
}

/// 学習器の統計情報
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnerStats {
    pub examples: usize,
    pub classes: usize,
    pub trained: bool,
}

impl std::fmt::Display for LearnerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ML Model: {} training examples, {} DBO fields, {}",
            self.examples,
            self.classes,
            if self.trained { "trained" } else { "not trained" }
        )
    }
}

/// k近傍による学習器
#[derive(Debug, Clone)]
pub struct StatisticalLearner {
    examples: Vec<TrainingExample>,
    /// DBOフィールド → ラベル
    labels: HashMap<String, usize>,
    /// ラベル → DBOフィールド（初出順）
    fields: Vec<String>,
    model: Option<Arc<LearnedModel>>,
    min_examples: usize,
    neighbors: usize,
}

impl Default for StatisticalLearner {
    fn default() -> Self {
        Self::with_settings(DEFAULT_MIN_EXAMPLES, DEFAULT_NEIGHBORS)
    }
}

impl StatisticalLearner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(min_examples: usize, neighbors: usize) -> Self {
        Self {
            examples: Vec::new(),
            labels: HashMap::new(),
            fields: Vec::new(),
            model: None,
            min_examples,
            neighbors,
        }
    }

    /// 教師データを追加
    ///
    /// 初出のDBOフィールドには次の連番ラベルを割り当てる。
    pub fn add_example(&mut self, point_name: &str, equipment_type: &str, correct_dbo_field: &str) {
        self.examples
            .push(TrainingExample::new(point_name, equipment_type, correct_dbo_field));

        if !self.labels.contains_key(correct_dbo_field) {
            self.labels
                .insert(correct_dbo_field.to_string(), self.fields.len());
            self.fields.push(correct_dbo_field.to_string());
        }

        debug!(
            "Added training example: '{}' ({}) -> '{}'",
            point_name, equipment_type, correct_dbo_field
        );
    }

    /// 蓄積したデータでモデルを学習
    ///
    /// データ不足なら何もせず false。学習に失敗した場合も以前のモデルを残す。
    pub fn train(&mut self) -> bool {
        if self.examples.len() < self.min_examples {
            warn!(
                "Need at least {} examples to train (have {})",
                self.min_examples,
                self.examples.len()
            );
            return false;
        }

        let samples: Vec<FeatureVector> = self
            .examples
            .par_iter()
            .map(|ex| extract_features(&ex.point_name, &ex.equipment_type))
            .collect();

        let targets: Option<Vec<usize>> = self
            .examples
            .iter()
            .map(|ex| self.labels.get(&ex.dbo_field).copied())
            .collect();
        let Some(targets) = targets else {
            error!("Training failed: example without label");
            return false;
        };

        match KnnClassifier::fit(samples, targets, self.neighbors) {
            Ok(classifier) => {
                let model = LearnedModel {
                    classifier,
                    fields: self.fields.clone(),
                };
                info!(
                    "KNN model trained! {} examples, {} classes (k={} neighbors)",
                    model.num_examples(),
                    model.num_classes(),
                    model.k()
                );
                self.model = Some(Arc::new(model));
                true
            }
            Err(e) => {
                error!("Training failed: {}", e);
                false
            }
        }
    }

    /// ポイントのDBOフィールドを予測
    pub fn predict(&self, point_name: &str, equipment_type: &str) -> Prediction {
        let Some(model) = self.model.as_ref() else {
            return Prediction::none("Model not trained");
        };

        let features = extract_features(point_name, equipment_type);
        match model.predict_field(&features) {
            Ok(Some(field)) => Prediction {
                dbo_field: Some(field.to_string()),
                confidence: ML_CONFIDENCE,
                reasoning: "ML prediction".to_string(),
            },
            Ok(None) => Prediction::none("Prediction error: unknown label"),
            Err(e) => Prediction::none(format!("Prediction error: {}", e)),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// 現在のモデルのスナップショット
    pub fn model(&self) -> Option<Arc<LearnedModel>> {
        self.model.clone()
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    /// DBOフィールドのラベル
    pub fn label_of(&self, dbo_field: &str) -> Option<usize> {
        self.labels.get(dbo_field).copied()
    }

    pub fn stats(&self) -> LearnerStats {
        LearnerStats {
            examples: self.examples.len(),
            classes: self.fields.len(),
            trained: self.is_ready(),
        }
    }
}
