//! プロンプト生成モジュール
//!
//! - COACHING_PROMPT: ポーズ評価の固定指示
//! - build_coaching_prompt: ポーズ名ヒント付きプロンプト

/// ポーズ評価の固定指示
///
/// 出力スキーマは FeedbackResult と一致させること
pub const COACHING_PROMPT: &str = r#"You are an experienced yoga instructor. Analyze the yoga pose in this image and provide corrective feedback.

## Output format (output exactly this JSON object)
{
  "assessment": "one or two sentences describing the overall pose",
  "cues": ["short corrective cue", "..."],
  "score": 0-10
}

## Rules
- Describe only what is visible. Do not guess hidden body parts.
- Each cue is one short imperative sentence that can be read aloud.
- At most 5 cues. Use an empty array if the pose needs no correction.
- score is a number from 0 (unsafe or unrecognisable) to 10 (textbook).
- If no person is visible, set assessment to "No pose detected", cues to [] and score to 0.
- Output the JSON object only. No explanation."#;

/// コーチング用プロンプト生成
///
/// # Arguments
/// * `pose_hint` - 練習者が申告したポーズ名（例: "Warrior II"）
///
/// # Returns
/// APIへ送るプロンプト文字列
pub fn build_coaching_prompt(pose_hint: Option<&str>) -> String {
    match pose_hint.map(str::trim).filter(|p| !p.is_empty()) {
        Some(pose) => format!(
            "{}\n\nThe practitioner says they are holding: {}. Judge the pose against that asana.",
            COACHING_PROMPT, pose
        ),
        None => COACHING_PROMPT.to_string(),
    }
}
