use crate::error::{AsanaError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIキーを読む環境変数
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_WAKE_WORD: &str = "click";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(serialize_with = "serialize_api_key")]
    pub api_key: Option<SecretString>,
    pub model: String,
    pub api_base_url: String,
    /// 送信前に長辺をこのサイズまで縮小（0で無効）
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub wake_word: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            max_image_size: 1024,
            timeout_seconds: 60,
            temperature: 0.2,
            wake_word: DEFAULT_WAKE_WORD.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "設定ファイルを読み込みました");
            Ok(config)
        } else {
            Ok(Self::default())
        }
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
            .ok_or_else(|| AsanaError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("asana-sense").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<SecretString> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(SecretString::from(key));
            }
        }

        self.api_key.clone().ok_or(AsanaError::MissingApiKey)
    }

    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_ok()
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AsanaError::Config("APIキーが空です".into()));
        }
        self.api_key = Some(SecretString::from(key.to_string()));
        self.save()
    }
}

/// 設定ファイルには平文で保存する（SecretStringはSerialize未実装）
fn serialize_api_key<S>(key: &Option<SecretString>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match key {
        Some(k) => serializer.serialize_some(k.expose_secret()),
        None => serializer.serialize_none(),
    }
}
