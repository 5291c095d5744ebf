//! コーチングAPI連携
//!
//! フレームと指示プロンプトを送り、モデルの生テキストを受け取る。
//! パースは session 側で行う。

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use crate::frame::Frame;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// マルチモーダル推論APIのクライアント
///
/// 1回の呼び出しにつき1リクエスト。リトライはしない。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CoachingClient {
    /// フレームとプロンプトを送信し、モデルが返したテキストを返す
    async fn request_feedback(&self, frame: &Frame, prompt: &str) -> Result<String>;
}
