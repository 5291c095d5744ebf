//! ウェイクワード検出
//!
//! 外部の音声認識が出力した書き起こし（1発話1行）に
//! ウェイクワードが含まれるかを判定する。
//! 単語境界は見ない（「撮影して」の「撮影」、"ok!" なども一致させる）

use crate::error::{AsanaError, Result};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct WakeWordDetector {
    word: String,
    pattern: Regex,
}

impl WakeWordDetector {
    pub fn new(word: &str) -> Result<Self> {
        let word = word.trim();
        if word.is_empty() {
            return Err(AsanaError::Config("ウェイクワードが空です".into()));
        }

        let pattern = Regex::new(&format!("(?i){}", regex::escape(word)))
            .map_err(|e| AsanaError::Config(format!("ウェイクワードが不正です: {}", e)))?;

        Ok(Self {
            word: word.to_string(),
            pattern,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// 書き起こしにウェイクワードが含まれるか（大文字小文字を区別しない部分一致）
    pub fn matches(&self, transcript: &str) -> bool {
        self.pattern.is_match(transcript)
    }
}
