//! APIレスポンスパーサー
//!
//! マルチモーダルAPIのテキストレスポンスからJSONを抽出し、
//! FeedbackResultにパース・検証する

use crate::error::{Error, Result};
use crate::types::FeedbackResult;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use asana_sense_common::extract_json;
///
/// let response = "Here you go: {\"assessment\": \"ok\", \"cues\": []}";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// フィードバックレスポンスをパース
///
/// 抽出 → デシリアライズ → 検証。どこで失敗しても部分的な結果は返さない
///
/// # Arguments
/// * `response` - APIが返したテキスト
///
/// # Returns
/// * `Ok(FeedbackResult)` - パース成功
/// * `Err` - JSONが見つからない、必須キー欠落、または値が範囲外
pub fn parse_feedback_response(response: &str) -> Result<FeedbackResult> {
    let json_str = extract_json(response)?;
    let result: FeedbackResult = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("フィードバック JSONパースエラー: {}", e)))?;
    result.validate()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Score;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is the feedback:
```json
{"assessment": "Good", "cues": []}
```
Keep practicing."#;

        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"assessment": "Good", "cues": []}"#);
    }

    #[test]
    fn test_extract_json_raw() {
        let response = r#"{"assessment": "Good", "cues": ["Lower hips"]}"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, response);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Result: {"assessment": "ok", "cues": []} hope it helps"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"assessment": "ok", "cues": []}"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("Sorry, I can't help with that.");
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("JSONが見つかりません"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_extract_json_empty_response() {
        assert!(extract_json("").is_err());
        assert!(extract_json("} reversed {").is_err());
    }

    // =============================================
    // parse_feedback_response テスト
    // =============================================

    #[test]
    fn test_parse_feedback_response() {
        let response = r#"{"assessment":"Good alignment","cues":["Lower hips"],"score":8}"#;

        let result = parse_feedback_response(response).unwrap();
        assert_eq!(result.assessment, "Good alignment");
        assert_eq!(result.cues, vec!["Lower hips".to_string()]);
        assert_eq!(result.score, Some(Score::Numeric(8.0)));
    }

    #[test]
    fn test_parse_feedback_response_preserves_fields() {
        let cases = [
            ("Strong base", vec!["Engage core", "Breathe"], Some(Score::Numeric(6.5))),
            ("Needs balance", vec![], None),
            ("Lovely", vec!["Lift chest"], Some(Score::Label("great".to_string()))),
        ];

        for (assessment, cues, score) in cases {
            let expected = FeedbackResult {
                assessment: assessment.to_string(),
                cues: cues.iter().map(|c| c.to_string()).collect(),
                score,
            };
            let response = serde_json::to_string(&expected).unwrap();
            let parsed = parse_feedback_response(&response).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn test_parse_feedback_response_with_block() {
        let response = "```json\n{\n  \"assessment\": \"Stable warrior\",\n  \"cues\": [\"Bend front knee\"]\n}\n```";

        let result = parse_feedback_response(response).unwrap();
        assert_eq!(result.assessment, "Stable warrior");
        assert_eq!(result.cues.len(), 1);
        assert!(result.score.is_none());
    }

    #[test]
    fn test_parse_feedback_response_ignores_extra_keys() {
        let response = r#"{"assessment":"Fine","cues":[],"pose":"tree"}"#;
        assert!(parse_feedback_response(response).is_ok());
    }

    #[test]
    fn test_parse_feedback_response_missing_assessment() {
        let response = r#"{"cues":["Lower hips"],"score":8}"#;
        let result = parse_feedback_response(response);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_feedback_response_missing_cues() {
        let response = r#"{"assessment":"Good alignment","score":8}"#;
        let result = parse_feedback_response(response);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_feedback_response_wrong_types() {
        let response = r#"{"assessment":"Good","cues":"Lower hips"}"#;
        assert!(parse_feedback_response(response).is_err());
    }

    #[test]
    fn test_parse_feedback_response_not_json() {
        let result = parse_feedback_response("Sorry, I can't help with that.");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_feedback_response_score_out_of_range() {
        let response = r#"{"assessment":"Good","cues":[],"score":42}"#;
        let result = parse_feedback_response(response);
        assert!(matches!(result, Err(Error::Schema(_))));
    }
}
