//! フレーム取得元
//!
//! - FileFrameSource: 固定の画像ファイル
//! - DirectoryFrameSource: 外部の撮影ツールが書き込むフォルダの最新画像

use super::{load_frame, Frame};
use crate::error::{AsanaError, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 撮影トリガー時に1枚のフレームを返す
pub trait FrameSource {
    fn capture(&self) -> Result<Frame>;

    /// ログ・表示用の説明
    fn describe(&self) -> String;
}

pub struct FileFrameSource {
    path: PathBuf,
    max_size: u32,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>, max_size: u32) -> Self {
        Self {
            path: path.into(),
            max_size,
        }
    }
}

impl FrameSource for FileFrameSource {
    fn capture(&self) -> Result<Frame> {
        load_frame(&self.path, self.max_size)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct DirectoryFrameSource {
    folder: PathBuf,
    max_size: u32,
}

impl DirectoryFrameSource {
    pub fn new(folder: impl Into<PathBuf>, max_size: u32) -> Result<Self> {
        let folder = folder.into();
        if !folder.is_dir() {
            return Err(AsanaError::FileNotFound(folder.display().to_string()));
        }
        Ok(Self { folder, max_size })
    }

    /// 更新日時が最も新しい画像（同時刻ならファイル名の大きい方）
    pub fn latest_image(&self) -> Result<PathBuf> {
        WalkDir::new(&self.folder)
            .max_depth(1) // 直下のみ
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_image(e.path()))
            .map(|e| {
                let modified = e
                    .metadata()
                    .ok()
                    .and_then(|m| m.modified().ok())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, e.into_path())
            })
            .max()
            .map(|(_, path)| path)
            .ok_or_else(|| AsanaError::NoFrameAvailable(self.folder.display().to_string()))
    }
}

impl FrameSource for DirectoryFrameSource {
    fn capture(&self) -> Result<Frame> {
        let path = self.latest_image()?;
        tracing::debug!(path = %path.display(), "最新フレームを選択");
        load_frame(&path, self.max_size)
    }

    fn describe(&self) -> String {
        format!("{} (最新画像)", self.folder.display())
    }
}

/// パスに応じた取得元を作る（フォルダなら最新画像）
pub fn frame_source_for(path: &Path, max_size: u32) -> Result<Box<dyn FrameSource>> {
    if path.is_dir() {
        Ok(Box::new(DirectoryFrameSource::new(path, max_size)?))
    } else if path.is_file() {
        Ok(Box::new(FileFrameSource::new(path, max_size)))
    } else {
        Err(AsanaError::FileNotFound(path.display().to_string()))
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
