pub mod address;

use crate::error::{DboMapperError, Result};
use dbo_mapper_common::PointDescriptor;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// 読み込んだポイントと、読めずに捨てた件数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBatch {
    pub points: Vec<PointDescriptor>,
    /// 形式が合わず読み飛ばした要素
    pub rejected: usize,
}

impl PointBatch {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn extend(&mut self, other: PointBatch) {
        self.points.extend(other.points);
        self.rejected += other.rejected;
    }
}

impl From<Vec<PointDescriptor>> for PointBatch {
    fn from(points: Vec<PointDescriptor>) -> Self {
        Self { points, rejected: 0 }
    }
}

/// ポイント一覧の供給元
pub trait PointProvider {
    fn points(&self) -> Result<PointBatch>;
}

impl PointProvider for Vec<PointDescriptor> {
    fn points(&self) -> Result<PointBatch> {
        Ok(PointBatch::from(self.clone()))
    }
}

/// JSONファイル（またはフォルダ直下の *.json）からポイントを読む
#[derive(Debug, Clone)]
pub struct JsonPointSource {
    path: PathBuf,
}

impl JsonPointSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointProvider for JsonPointSource {
    fn points(&self) -> Result<PointBatch> {
        if !self.path.exists() {
            return Err(DboMapperError::FileNotFound(self.path.display().to_string()));
        }

        let files = if self.path.is_dir() {
            scan_folder(&self.path)?
        } else {
            vec![self.path.clone()]
        };

        let mut batch = PointBatch::default();
        for file in files {
            batch.extend(read_points_file(&file)?);
        }

        Ok(batch)
    }
}

/// フォルダ直下のJSONファイル（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(DboMapperError::FolderNotFound(folder.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_json_file(p))
        .collect();

    files.sort();
    Ok(files)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// ポイント一覧ファイルを読み込み
///
/// ファイル全体が配列でなければエラー。形式の合わない要素は警告を出して読み飛ばす。
pub fn read_points_file(path: &Path) -> Result<PointBatch> {
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&content).map_err(|e| {
        DboMapperError::InvalidPointSource(format!("{}: {}", path.display(), e))
    })?;

    let mut batch = PointBatch::default();
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<PointDescriptor>(entry) {
            Ok(mut point) => {
                normalize_units(&mut point);
                batch.points.push(point);
            }
            Err(e) => {
                warn!("Skipping point {} in {}: {}", i + 1, path.display(), e);
                batch.rejected += 1;
            }
        }
    }

    Ok(batch)
}

/// 空文字や "null" の単位は未設定とみなす
fn normalize_units(point: &mut PointDescriptor) {
    let empty = point
        .units
        .as_deref()
        .map(|u| u.trim().is_empty() || u == "null")
        .unwrap_or(false);
    if empty {
        point.units = None;
    }
}
