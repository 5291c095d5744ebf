//! 結果の表示と読み上げテキスト出力

use crate::error::Result;
use crate::session::LatestFeedback;
use std::path::Path;

/// ターミナル表示用に整形
pub fn format_feedback(latest: &LatestFeedback) -> String {
    let result = &latest.result;
    let mut lines = vec![
        format!(
            "🧘 {} ({} / {})",
            latest.captured_at.format("%H:%M:%S"),
            latest.trigger,
            latest.source
        ),
        format!("  評価: {}", result.assessment),
    ];

    if result.cues.is_empty() {
        lines.push("  修正ポイント: なし".to_string());
    } else {
        lines.push("  修正ポイント:".to_string());
        lines.extend(result.cues.iter().map(|cue| format!("    - {}", cue)));
    }

    if let Some(score) = &result.score {
        lines.push(format!("  スコア: {}", score));
    }

    lines.join("\n")
}

/// 読み上げテキストをファイルに書き出す（外部TTS用、毎回上書き）
pub fn write_speech_text(path: &Path, latest: &LatestFeedback) -> Result<()> {
    std::fs::write(path, latest.result.spoken_text())?;
    Ok(())
}
