//! フレーム（静止画）モジュール
//!
//! 撮影された画像を読み込み、必要なら縮小してPNGに再エンコードする。
//! フレームは1回のリクエストの間だけ存在する。

mod source;

pub use source::{frame_source_for, DirectoryFrameSource, FileFrameSource, FrameSource};

use crate::error::{AsanaError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Local};
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;

pub const PNG_MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone)]
pub struct Frame {
    /// エンコード済み画像データ
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// 表示用の取得元（ファイルパス等）
    pub source: String,
    pub captured_at: DateTime<Local>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            source: source.into(),
            captured_at: Local::now(),
        }
    }

    /// API送信用のBase64文字列
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// 画像ファイルを読み込んでPNGフレームに変換
///
/// # Arguments
/// * `path` - 画像ファイル（jpg/png）
/// * `max_size` - 長辺の上限px（0なら縮小しない）
pub fn load_frame(path: &Path, max_size: u32) -> Result<Frame> {
    if !path.is_file() {
        return Err(AsanaError::FileNotFound(path.display().to_string()));
    }

    let data = std::fs::read(path)?;
    let bytes = encode_png(&data, max_size)
        .map_err(|e| AsanaError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(
        path = %path.display(),
        original_bytes = data.len(),
        encoded_bytes = bytes.len(),
        "フレームを読み込みました"
    );

    Ok(Frame::new(bytes, PNG_MIME_TYPE, path.display().to_string()))
}

/// 任意形式の画像データをPNGに再エンコード（必要なら縮小）
pub fn encode_png(data: &[u8], max_size: u32) -> std::result::Result<Vec<u8>, image::ImageError> {
    let mut img = image::load_from_memory(data)?;

    if max_size > 0 && (img.width() > max_size || img.height() > max_size) {
        // resize はアスペクト比を保って枠内に収める
        img = img.resize(max_size, max_size, FilterType::Triangle);
    }

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
