use crate::error::{DboMapperError, Result};
use serde::{Deserialize, Serialize};
use dbo_mapper_common::Vocabulary;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MIN_CONFIDENCE_ENV: &str = "DBO_MAPPER_MIN_CONFIDENCE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// インデックスに採用する最低信頼度 (0-100)
    pub min_confidence: u8,
    pub min_training_examples: usize,
    /// k近傍のk
    pub neighbors: usize,
    /// エンティティ化しない機器パス
    pub excluded_path_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_confidence: 50,
            min_training_examples: 5,
            neighbors: 5,
            excluded_path_prefixes: vec!["/Services/".into()],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str::<Config>(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        if let Ok(value) = std::env::var(MIN_CONFIDENCE_ENV) {
            let parsed: i64 = value.trim().parse().map_err(|_| {
                DboMapperError::Config(format!("{} が数値ではありません: {}", MIN_CONFIDENCE_ENV, value))
            })?;
            config.min_confidence = parsed.clamp(0, 100) as u8;
        }

        config.min_confidence = config.min_confidence.min(100);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DboMapperError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("dbo-mapper").join("config.json"))
    }

    /// 最低信頼度を設定（100を超える値は100に丸める）
    pub fn set_min_confidence(&mut self, value: u8) -> Result<()> {
        self.min_confidence = value.min(100);
        self.save()
    }

    pub fn is_excluded_path(&self, path: &str) -> bool {
        self.excluded_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// 語彙を用意する（ファイル指定がなければ標準語彙）
pub fn load_vocabulary(path: Option<&Path>) -> Result<Arc<Vocabulary>> {
    let vocabulary = match path {
        Some(path) => {
            if !path.exists() {
                return Err(DboMapperError::FileNotFound(path.display().to_string()));
            }
            Vocabulary::from_file(path)?
        }
        None => Vocabulary::standard(),
    };
    Ok(Arc::new(vocabulary))
}
