//! ハンズフリー撮影ループ
//!
//! 書き起こしを1行ずつ読み、ウェイクワードを含む行（または空行=ボタン）で
//! 現在のフレームを撮影してフィードバックを得る。失敗しても次の行へ進む。

use crate::coach::CoachingClient;
use crate::display;
use crate::error::Result;
use crate::frame::FrameSource;
use crate::session::{CaptureTrigger, FeedbackSession};
use crate::wake::WakeWordDetector;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListenSummary {
    pub lines: usize,
    pub captures: usize,
    pub failures: usize,
}

pub struct ListenOptions {
    pub detector: WakeWordDetector,
    /// 成功のたびに読み上げテキストを書き出す先
    pub speak_to: Option<PathBuf>,
}

/// 書き起こしの1行を撮影トリガーに変換
pub fn trigger_for_line(line: &str, detector: &WakeWordDetector) -> Option<CaptureTrigger> {
    let line = line.trim();
    if line.is_empty() {
        Some(CaptureTrigger::Button)
    } else if detector.matches(line) {
        Some(CaptureTrigger::WakeWord(line.to_string()))
    } else {
        None
    }
}

/// 入力が尽きるまで撮影ループを回す
pub async fn run_listen<C, R, W>(
    session: &mut FeedbackSession<C>,
    frames: &dyn FrameSource,
    options: &ListenOptions,
    transcript: R,
    out: &mut W,
) -> Result<ListenSummary>
where
    C: CoachingClient + Sync,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut summary = ListenSummary::default();
    let mut lines = transcript.lines();

    while let Some(line) = lines.next_line().await? {
        summary.lines += 1;

        let Some(trigger) = trigger_for_line(&line, &options.detector) else {
            tracing::debug!(line = %line, "ウェイクワードなし");
            continue;
        };

        writeln!(out, "🎤 {} – 撮影中...", trigger)?;

        let frame = match frames.capture() {
            Ok(frame) => frame,
            Err(e) => {
                summary.failures += 1;
                writeln!(out, "✖ {}", e)?;
                continue;
            }
        };

        match session.capture(frame, trigger).await {
            Ok(latest) => {
                summary.captures += 1;
                writeln!(out, "{}", display::format_feedback(latest))?;
                if let Some(path) = &options.speak_to {
                    // 書き出し失敗は報告のみ。結果は表示済みなので撮影は成功扱い
                    if let Err(e) = display::write_speech_text(path, latest) {
                        tracing::warn!(path = %path.display(), error = %e, "読み上げテキストの書き出し失敗");
                        writeln!(out, "✖ {}", e)?;
                    }
                }
            }
            Err(e) if e.is_capture_failure() => {
                summary.failures += 1;
                writeln!(out, "✖ {}", e)?;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}
