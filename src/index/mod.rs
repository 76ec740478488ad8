//! オントロジーインデックス
//!
//! エンティティIDをキーにエンティティを保持する。列挙順は追加順。
//! 再構築は新しいインデックスを作って丸ごと差し替える（サービス側）。

pub mod model;
pub mod views;

pub use model::{OntologyEntity, OntologyPoint};

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct OntologyIndex {
    entities: Vec<OntologyEntity>,
    /// id → entities の位置
    positions: HashMap<String, usize>,
}

impl OntologyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    /// 全エンティティのポイント数合計
    pub fn num_points(&self) -> usize {
        self.entities.iter().map(|e| e.points.len()).sum()
    }

    pub fn get_entity(&self, id: &str) -> Option<&OntologyEntity> {
        self.positions.get(id).map(|&i| &self.entities[i])
    }

    pub fn get_entity_mut(&mut self, id: &str) -> Option<&mut OntologyEntity> {
        match self.positions.get(id) {
            Some(&i) => self.entities.get_mut(i),
            None => None,
        }
    }

    /// 追加順のエンティティ
    pub fn entities(&self) -> impl Iterator<Item = &OntologyEntity> {
        self.entities.iter()
    }

    /// エンティティを追加（同じIDがあれば同じ位置で置き換え）
    pub fn add_entity(&mut self, entity: OntologyEntity) {
        match self.positions.get(&entity.id) {
            Some(&i) => self.entities[i] = entity,
            None => {
                self.positions.insert(entity.id.clone(), self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.positions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
