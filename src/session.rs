//! 撮影・フィードバックサイクル
//!
//! フレーム1枚 → API呼び出し → パース → 直近結果スロットの更新。
//! 失敗時はスロットに触れず、前回の結果を表示し続ける。

use crate::coach::CoachingClient;
use crate::error::{AsanaError, Result};
use crate::frame::Frame;
use asana_sense_common::{parse_feedback_response, FeedbackResult};
use chrono::{DateTime, Local};
use std::fmt;

/// 撮影のきっかけ
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureTrigger {
    /// ボタン（コマンド実行・Enterキー）
    Button,
    /// ウェイクワードを含んだ書き起こし
    WakeWord(String),
}

impl fmt::Display for CaptureTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureTrigger::Button => write!(f, "ボタン"),
            CaptureTrigger::WakeWord(transcript) => write!(f, "音声「{}」", transcript),
        }
    }
}

/// 直近の成功結果
#[derive(Debug, Clone)]
pub struct LatestFeedback {
    pub result: FeedbackResult,
    pub trigger: CaptureTrigger,
    pub source: String,
    pub captured_at: DateTime<Local>,
}

/// 1回分のサイクル（状態なし）
///
/// 通信失敗は Transport、パース失敗は MalformedResponse として返す
pub async fn run_cycle<C>(client: &C, frame: &Frame, prompt: &str) -> Result<FeedbackResult>
where
    C: CoachingClient + Sync + ?Sized,
{
    let raw = client.request_feedback(frame, prompt).await?;
    parse_feedback_response(&raw).map_err(|e| AsanaError::malformed(e.to_string(), &raw))
}

pub struct FeedbackSession<C> {
    client: C,
    prompt: String,
    latest: Option<LatestFeedback>,
}

impl<C> FeedbackSession<C>
where
    C: CoachingClient + Sync,
{
    pub fn new(client: C, prompt: impl Into<String>) -> Self {
        Self {
            client,
            prompt: prompt.into(),
            latest: None,
        }
    }

    pub fn latest(&self) -> Option<&LatestFeedback> {
        self.latest.as_ref()
    }

    /// フレームを1枚解析し、成功すれば直近結果を置き換える
    ///
    /// フレームはこの呼び出しの間だけ保持される
    pub async fn capture(&mut self, frame: Frame, trigger: CaptureTrigger) -> Result<&LatestFeedback> {
        tracing::info!(trigger = %trigger, source = %frame.source, bytes = frame.bytes.len(), "撮影");

        match run_cycle(&self.client, &frame, &self.prompt).await {
            Ok(result) => {
                tracing::debug!(cues = result.cues.len(), "フィードバック取得");
                let latest = self.latest.insert(LatestFeedback {
                    result,
                    trigger,
                    source: frame.source,
                    captured_at: frame.captured_at,
                });
                Ok(&*latest)
            }
            Err(e) => {
                tracing::warn!(error = %e, "撮影サイクル失敗（前回の結果を保持）");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::MockCoachingClient;
    use crate::frame::PNG_MIME_TYPE;
    use asana_sense_common::Score;

    const GOOD_RESPONSE: &str =
        r#"{"assessment":"Good alignment","cues":["Lower hips"],"score":8}"#;

    fn frame(name: &str) -> Frame {
        Frame::new(vec![1, 2, 3], PNG_MIME_TYPE, name)
    }

    #[tokio::test]
    async fn test_capture_success_updates_latest() {
        let mut client = MockCoachingClient::new();
        client
            .expect_request_feedback()
            .withf(|frame, prompt| frame.source == "pose.png" && prompt.to_string() == "coach me")
            .times(1)
            .returning(|_, _| Ok(GOOD_RESPONSE.to_string()));

        let mut session = FeedbackSession::new(client, "coach me");
        let latest = session
            .capture(frame("pose.png"), CaptureTrigger::Button)
            .await
            .unwrap();

        assert_eq!(latest.result.assessment, "Good alignment");
        assert_eq!(latest.result.cues, vec!["Lower hips".to_string()]);
        assert_eq!(latest.result.score, Some(Score::Numeric(8.0)));
        assert_eq!(latest.trigger, CaptureTrigger::Button);
        assert_eq!(session.latest().unwrap().source, "pose.png");
    }

    #[tokio::test]
    async fn test_malformed_response_produces_no_result() {
        let mut client = MockCoachingClient::new();
        client
            .expect_request_feedback()
            .returning(|_, _| Ok("Sorry, I can't help with that.".to_string()));

        let mut session = FeedbackSession::new(client, "coach me");
        let err = session
            .capture(frame("pose.png"), CaptureTrigger::Button)
            .await
            .unwrap_err();

        match err {
            AsanaError::MalformedResponse { raw, .. } => {
                assert_eq!(raw, "Sorry, I can't help with that.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(session.latest().is_none());
    }

    #[tokio::test]
    async fn test_missing_key_is_malformed() {
        let mut client = MockCoachingClient::new();
        client
            .expect_request_feedback()
            .returning(|_, _| Ok(r#"{"assessment":"Good alignment","score":8}"#.to_string()));

        let mut session = FeedbackSession::new(client, "coach me");
        let err = session
            .capture(frame("pose.png"), CaptureTrigger::Button)
            .await
            .unwrap_err();
        assert!(matches!(err, AsanaError::MalformedResponse { .. }));
        assert!(session.latest().is_none());
    }

    #[tokio::test]
    async fn test_failures_keep_previous_result() {
        let mut client = MockCoachingClient::new();
        let mut seq = mockall::Sequence::new();
        client
            .expect_request_feedback()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(GOOD_RESPONSE.to_string()));
        client
            .expect_request_feedback()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(AsanaError::Transport("connection reset".to_string())));
        client
            .expect_request_feedback()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("not json".to_string()));

        let mut session = FeedbackSession::new(client, "coach me");
        session
            .capture(frame("first.png"), CaptureTrigger::Button)
            .await
            .unwrap();

        let err = session
            .capture(frame("second.png"), CaptureTrigger::WakeWord("click".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AsanaError::Transport(_)));

        let err = session
            .capture(frame("third.png"), CaptureTrigger::Button)
            .await
            .unwrap_err();
        assert!(matches!(err, AsanaError::MalformedResponse { .. }));

        let latest = session.latest().unwrap();
        assert_eq!(latest.source, "first.png");
        assert_eq!(latest.result.assessment, "Good alignment");
    }

    #[tokio::test]
    async fn test_new_capture_replaces_latest() {
        let mut client = MockCoachingClient::new();
        let mut seq = mockall::Sequence::new();
        client
            .expect_request_feedback()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(GOOD_RESPONSE.to_string()));
        client
            .expect_request_feedback()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(r#"{"assessment":"Wobbly","cues":[]}"#.to_string()));

        let mut session = FeedbackSession::new(client, "coach me");
        session
            .capture(frame("a.png"), CaptureTrigger::Button)
            .await
            .unwrap();
        session
            .capture(frame("b.png"), CaptureTrigger::WakeWord("click".into()))
            .await
            .unwrap();

        let latest = session.latest().unwrap();
        assert_eq!(latest.result.assessment, "Wobbly");
        assert!(latest.result.score.is_none());
        assert_eq!(latest.trigger, CaptureTrigger::WakeWord("click".into()));
    }

    #[test]
    fn test_trigger_display() {
        assert_eq!(CaptureTrigger::Button.to_string(), "ボタン");
        assert_eq!(
            CaptureTrigger::WakeWord("ok click".into()).to_string(),
            "音声「ok click」"
        );
    }
}
