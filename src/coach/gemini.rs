//! Gemini API (generateContent) クライアント

use super::CoachingClient;
use crate::config::Config;
use crate::error::{AsanaError, Result};
use crate::frame::Frame;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// エラー表示に含めるレスポンス本文の最大文字数
const ERROR_BODY_CHARS: usize = 200;

/// Gemini APIリクエスト
#[derive(Serialize)]
pub(crate) struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// 設定（環境変数優先）からAPIキーを取得して生成
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        Self::new(api_key, config)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl CoachingClient for GeminiClient {
    async fn request_feedback(&self, frame: &Frame, prompt: &str) -> Result<String> {
        let request = build_request(frame, prompt, self.temperature);
        let started = Instant::now();

        // キーはURLに含めずヘッダで渡す（エラーメッセージに漏れないように）
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            model = %self.model,
            status = %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_bytes = body.len(),
            "Gemini API応答"
        );

        if !status.is_success() {
            let excerpt: String = body.chars().take(ERROR_BODY_CHARS).collect();
            return Err(AsanaError::Transport(format!("HTTP {}: {}", status, excerpt)));
        }

        extract_response_text(&body)
    }
}

/// リクエスト本文を組み立て（プロンプト → 画像の順）
pub(crate) fn build_request(frame: &Frame, prompt: &str, temperature: f32) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: frame.mime_type.clone(),
                        data: frame.to_base64(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature,
            response_mime_type: "application/json".to_string(),
        },
    }
}

/// レスポンス本文から最初の候補のテキストを取り出す
///
/// 候補が空（セーフティブロック等）やテキストなしは MalformedResponse
pub(crate) fn extract_response_text(body: &str) -> Result<String> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| AsanaError::malformed(format!("レスポンス形式エラー: {}", e), body))?;

    let Some(candidate) = response.candidates.first() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(AsanaError::malformed(format!("候補なし ({})", reason), body));
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .clone()
            .unwrap_or_else(|| "empty".to_string());
        return Err(AsanaError::malformed(format!("テキストなし ({})", reason), body));
    }

    Ok(text)
}
