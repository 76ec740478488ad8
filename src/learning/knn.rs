//! k近傍分類器（ユークリッド距離・多数決）

use super::features::{FeatureVector, FEATURE_COUNT};
use crate::error::{DboMapperError, Result};
use std::collections::HashMap;

/// 学習済みk近傍モデル
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    samples: Vec<FeatureVector>,
    labels: Vec<usize>,
    k: usize,
}

impl KnnClassifier {
    /// 学習データからモデルを作る
    pub fn fit(samples: Vec<FeatureVector>, labels: Vec<usize>, k: usize) -> Result<Self> {
        if samples.len() != labels.len() {
            return Err(DboMapperError::Training(format!(
                "サンプル数({})とラベル数({})が一致しません",
                samples.len(),
                labels.len()
            )));
        }
        if k == 0 {
            return Err(DboMapperError::Training("k は1以上が必要です".into()));
        }
        if samples.len() < k {
            return Err(DboMapperError::Training(format!(
                "サンプル数({})が k({}) より少ない",
                samples.len(),
                k
            )));
        }
        if let Some(bad) = samples.iter().position(|s| s.iter().any(|v| !v.is_finite())) {
            return Err(DboMapperError::Training(format!("サンプル{}に有限でない値", bad)));
        }

        Ok(Self { samples, labels, k })
    }

    /// k個の近傍の多数決でラベルを返す
    ///
    /// 距離が同じ場合は学習データの順序が先のものを近いとみなす。
    /// 票数が同じ場合は小さいラベルを採用する。
    pub fn predict(&self, features: &FeatureVector) -> Result<usize> {
        if features.iter().any(|v| !v.is_finite()) {
            return Err(DboMapperError::Training("入力に有限でない値".into()));
        }

        let mut distances: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, sample)| (squared_distance(sample, features), i))
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut votes: HashMap<usize, usize> = HashMap::new();
        for &(_, i) in distances.iter().take(self.k) {
            *votes.entry(self.labels[i]).or_insert(0) += 1;
        }

        votes
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(label, _)| label)
            .ok_or_else(|| DboMapperError::Training("近傍が見つかりません".into()))
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    (0..FEATURE_COUNT).map(|i| (a[i] - b[i]).powi(2)).sum()
}
