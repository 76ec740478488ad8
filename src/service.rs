//! オントロジーサービス
//!
//! ポイントソースを走査してインデックスを再構築し、修正の受け付けと
//! モデルの学習を行う。
//!
//! - インデックスは別に組み立ててから丸ごと差し替える（読み手は常に完成品を見る）
//! - 学習器と補正器は書き込みロックで直列化する
//! - 1件のポイントの失敗は記録して走査を続ける

use crate::arbitrator::{Arbitrator, Resolution};
use crate::config::Config;
use crate::corrections::CorrectionRecord;
use crate::error::{DboMapperError, Result};
use crate::index::views::{self, IndexExport};
use crate::index::{OntologyEntity, OntologyIndex, OntologyPoint};
use crate::learning::{Corrector, StatisticalLearner};
use crate::matcher::RuleMatcher;
use crate::scanner::address::{self, BOOLEAN_MAPPING};
use crate::scanner::PointProvider;
use dbo_mapper_common::{PointDescriptor, PointKind, Vocabulary};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// 再構築の集計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildStats {
    pub points_scanned: usize,
    pub points_matched: usize,
    pub entities: usize,
    /// 処理に失敗したポイント
    pub failures: usize,
    /// 最低信頼度に届かなかったポイント
    pub low_confidence: usize,
    /// 機器がない、または除外パス配下のポイント
    pub skipped: usize,
    pub elapsed: Duration,
}

impl std::fmt::Display for RebuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entities, {} points scanned, {} points matched",
            self.entities, self.points_scanned, self.points_matched
        )
    }
}

/// 学習状況
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearningStats {
    pub examples: usize,
    pub classes: usize,
    pub trained: bool,
    pub corrections: usize,
    pub patterns: usize,
}

impl std::fmt::Display for LearningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ML Model: {} training examples, {} DBO fields, {}; Learned from {} corrections, {} patterns discovered",
            self.examples,
            self.classes,
            if self.trained { "trained" } else { "not trained" },
            self.corrections,
            self.patterns
        )
    }
}

enum PointOutcome {
    Matched,
    LowConfidence,
    Skipped,
}

pub struct OntologyService {
    vocabulary: Arc<Vocabulary>,
    config: Config,
    arbitrator: Arbitrator,
    index: RwLock<Arc<OntologyIndex>>,
    learner: RwLock<StatisticalLearner>,
    corrector: RwLock<Corrector>,
}

impl OntologyService {
    pub fn new(vocabulary: Arc<Vocabulary>, config: Config) -> Self {
        let arbitrator = Arbitrator::new(RuleMatcher::new(Arc::clone(&vocabulary)));
        let learner =
            StatisticalLearner::with_settings(config.min_training_examples, config.neighbors);

        Self {
            vocabulary,
            config,
            arbitrator,
            index: RwLock::new(Arc::new(OntologyIndex::new())),
            learner: RwLock::new(learner),
            corrector: RwLock::new(Corrector::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// 現在のインデックス（差し替えの影響を受けないスナップショット）
    pub fn index(&self) -> Arc<OntologyIndex> {
        Arc::clone(&read_lock(&self.index))
    }

    /// インデックス全体をJSONビューとして書き出す
    pub fn export(&self) -> IndexExport {
        views::export(&self.index())
    }

    /// ポイントソースからインデックスを再構築
    pub fn rebuild_index(&self, provider: &dyn PointProvider) -> Result<RebuildStats> {
        let batch = provider.points()?;
        let mut stats = self.index_points(&batch.points, |_| {});
        stats.points_scanned += batch.rejected;
        stats.failures += batch.rejected;
        Ok(stats)
    }

    /// ポイント一覧からインデックスを再構築（1件ごとに `progress` を呼ぶ）
    pub fn index_points<F>(&self, points: &[PointDescriptor], mut progress: F) -> RebuildStats
    where
        F: FnMut(&PointDescriptor),
    {
        info!("Ontology reindex start ({} points)", points.len());
        let started = Instant::now();

        let mut staged = OntologyIndex::new();
        let mut stats = RebuildStats::default();

        {
            let learner = read_lock(&self.learner);
            let corrector = read_lock(&self.corrector);

            for point in points {
                stats.points_scanned += 1;

                match self.index_point(&mut staged, point, &learner, &corrector) {
                    Ok(PointOutcome::Matched) => stats.points_matched += 1,
                    Ok(PointOutcome::LowConfidence) => stats.low_confidence += 1,
                    Ok(PointOutcome::Skipped) => stats.skipped += 1,
                    Err(e) => {
                        error!("FAILED to index: {} ({})", describe(point), e);
                        stats.failures += 1;
                    }
                }

                progress(point);
            }
        }

        stats.entities = staged.num_entities();
        stats.elapsed = started.elapsed();

        *write_lock(&self.index) = Arc::new(staged);

        info!(
            "Ontology reindex complete [{:?}, {}]",
            stats.elapsed, stats
        );
        stats
    }

    fn index_point(
        &self,
        staged: &mut OntologyIndex,
        point: &PointDescriptor,
        learner: &StatisticalLearner,
        corrector: &Corrector,
    ) -> Result<PointOutcome> {
        let point_name = point.display_name.trim();
        if point_name.is_empty() {
            return Err(DboMapperError::InvalidPointSource(
                "ポイントの表示名が空です".into(),
            ));
        }

        if point.kind == PointKind::Unsupported {
            trace!("Unsupported point kind: {}", point_name);
            return Ok(PointOutcome::Skipped);
        }

        let Some(entity_id) = self.find_or_create_entity(staged, point) else {
            return Ok(PointOutcome::Skipped);
        };
        let entity = staged
            .get_entity_mut(&entity_id)
            .ok_or_else(|| DboMapperError::EntityNotFound(entity_id.clone()))?;

        let units = point.units.as_deref();
        let resolution = self.arbitrator.resolve_detailed(
            point_name,
            units,
            point.kind.is_boolean(),
            &entity.entity_type,
            learner,
        );
        let mut result = resolution.result;
        result.confidence =
            corrector.adjust_confidence(point_name, &result.dbo_field, result.confidence);

        if result.confidence < self.config.min_confidence {
            trace!(
                "Low confidence match ({}%) for: {}",
                result.confidence,
                point_name
            );
            return Ok(PointOutcome::LowConfidence);
        }

        let enum_mapping = match point.kind {
            PointKind::Boolean => Some(BOOLEAN_MAPPING.to_string()),
            PointKind::Enum => point
                .enum_range
                .as_deref()
                .and_then(address::enum_mapping),
            PointKind::Numeric | PointKind::Unsupported => None,
        };
        let point_key = if point.name.is_empty() { point_name } else { point.name.as_str() };

        entity.add_point(OntologyPoint {
            dbo_field: result.dbo_field,
            original_name: point_name.to_string(),
            address: address::point_address(&point.equipment.path, &point.path, point_key),
            units: point.units.clone(),
            enum_mapping,
            confidence: result.confidence,
            min_value: point.min_value,
            max_value: point.max_value,
            precision: point.precision,
        });

        Ok(PointOutcome::Matched)
    }

    /// 機器に対応するエンティティのIDを返す（なければ作る）
    ///
    /// 機器がない、または除外パス配下なら None。
    fn find_or_create_entity(
        &self,
        staged: &mut OntologyIndex,
        point: &PointDescriptor,
    ) -> Option<String> {
        let equipment = &point.equipment;
        if equipment.path.is_empty() {
            return None;
        }

        let id = address::entity_id(&equipment.path);
        if staged.get_entity(&id).is_some() {
            return Some(id);
        }

        let path = address::unescape_path(&equipment.path);
        if self.config.is_excluded_path(&path) {
            trace!("Excluded entity path: {}", path);
            return None;
        }

        let name = if equipment.display_name.trim().is_empty() {
            path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(&path).to_string()
        } else {
            equipment.display_name.clone()
        };
        let entity_type = self.vocabulary.infer_entity_type(&name).to_string();

        debug!("New entity: {} ({}) at {}", name, entity_type, path);
        staged.add_entity(OntologyEntity::new(&id, &name, &path, &entity_type));
        Some(id)
    }

    /// 単一ポイントを照合（補正込み）
    pub fn match_point(
        &self,
        point_name: &str,
        units: Option<&str>,
        is_boolean: bool,
        equipment_type: &str,
    ) -> Resolution {
        let learner = read_lock(&self.learner);
        let mut resolution = self.arbitrator.resolve_detailed(
            point_name,
            units,
            is_boolean,
            equipment_type,
            &learner,
        );

        let corrector = read_lock(&self.corrector);
        resolution.result.confidence = corrector.adjust_confidence(
            point_name,
            &resolution.result.dbo_field,
            resolution.result.confidence,
        );
        resolution
    }

    /// 修正を受け付ける
    ///
    /// 学習器に教師データとして追加し、補正器にも記録する。
    /// `wrong_match` が無ければルール照合の結果を誤りとして記録する。
    pub fn add_correction(
        &self,
        point_name: &str,
        correct_match: &str,
        equipment_type: &str,
        wrong_match: Option<&str>,
    ) {
        write_lock(&self.learner).add_example(point_name, equipment_type, correct_match);

        let wrong = match wrong_match {
            Some(wrong) => wrong.to_string(),
            None => {
                self.arbitrator
                    .matcher()
                    .match_point(point_name, None, false)
                    .dbo_field
            }
        };
        write_lock(&self.corrector).record_correction(point_name, &wrong, correct_match);

        info!("ML correction added: {} -> {}", point_name, correct_match);
    }

    /// 修正データをまとめて受け付ける
    pub fn apply_corrections(&self, records: &[CorrectionRecord]) {
        for record in records {
            self.add_correction(
                &record.point_name,
                &record.correct_match,
                &record.equipment_type,
                record.wrong_match.as_deref(),
            );
        }
    }

    /// モデルを学習（データ不足や失敗なら false）
    pub fn train_model(&self) -> bool {
        let success = write_lock(&self.learner).train();
        if success {
            info!("ML model trained successfully");
        } else {
            warn!(
                "ML training failed - need at least {} examples",
                self.config.min_training_examples
            );
        }
        success
    }

    pub fn learning_stats(&self) -> LearningStats {
        let learner = read_lock(&self.learner).stats();
        let corrector = read_lock(&self.corrector).stats();

        LearningStats {
            examples: learner.examples,
            classes: learner.classes,
            trained: learner.trained,
            corrections: corrector.corrections,
            patterns: corrector.patterns,
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn describe(point: &PointDescriptor) -> &str {
    if !point.path.is_empty() {
        &point.path
    } else if !point.name.is_empty() {
        &point.name
    } else {
        "<unnamed>"
    }
}
