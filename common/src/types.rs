//! コーチング結果の型定義
//!
//! CLIとライブラリで共有される型:
//! - FeedbackResult: マルチモーダルAPIのフィードバック（パース済み）
//! - Score: 数値または区分のスコア

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 数値スコアの上限（プロンプトで 0-10 を指定している）
pub const MAX_SCORE: f64 = 10.0;

/// ポーズのスコア
///
/// APIは数値（`8`）か区分（`"good"`）のどちらかを返す
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Numeric(f64),
    Label(String),
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Numeric(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Score::Numeric(v) => write!(f, "{:.1}", v),
            Score::Label(label) => write!(f, "{}", label),
        }
    }
}

/// コーチングAPIのフィードバック
///
/// `assessment` と `cues` は必須キー。欠けている場合はデシリアライズ自体が失敗する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    /// 短い総評
    pub assessment: String,

    /// 修正ポイント（空配列可）
    pub cues: Vec<String>,

    /// スコア（任意）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

impl FeedbackResult {
    /// キーの存在以外の制約を検証
    pub fn validate(&self) -> Result<()> {
        if self.assessment.trim().is_empty() {
            return Err(Error::Schema("assessment is empty".into()));
        }

        match &self.score {
            Some(Score::Numeric(v)) if !v.is_finite() || *v < 0.0 || *v > MAX_SCORE => {
                Err(Error::Schema(format!(
                    "score {} is outside 0-{}",
                    v, MAX_SCORE
                )))
            }
            Some(Score::Label(label)) if label.trim().is_empty() => {
                Err(Error::Schema("score label is empty".into()))
            }
            _ => Ok(()),
        }
    }

    /// 読み上げ用テキストを生成
    ///
    /// 総評 → 修正ポイント → スコアの順に1文ずつ並べる
    pub fn spoken_text(&self) -> String {
        let mut sentences = vec![sentence(&self.assessment)];
        sentences.extend(
            self.cues
                .iter()
                .filter(|cue| !cue.trim().is_empty())
                .map(|cue| sentence(cue)),
        );

        match &self.score {
            Some(score @ Score::Numeric(_)) => {
                sentences.push(format!("Score: {} out of {}.", score, MAX_SCORE as i64));
            }
            Some(score @ Score::Label(_)) => {
                sentences.push(format!("Score: {}.", score));
            }
            None => {}
        }

        sentences.join(" ")
    }
}

/// 末尾に句点がなければ補う
fn sentence(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}
