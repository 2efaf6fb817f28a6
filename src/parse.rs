//! Tolerant parsing of the model's free-text reply.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::hashtags::AnalysisResult;

// Opening fence with an optional language tag, e.g. "```json".
static OPEN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*\s*").expect("static regex"));

static CLOSE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```$").expect("static regex"));

/// Remove a surrounding markdown code fence, if the text starts with one.
///
/// A closing fence is only stripped when an opening fence was found.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let after_open = match OPEN_FENCE.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let body = match CLOSE_FENCE.find(after_open) {
        Some(m) => &after_open[..m.start()],
        None => after_open,
    };
    body.trim()
}

/// Parse the model reply as an [`AnalysisResult`].
///
/// Only the shape is checked (object of objects of non-negative integers);
/// hashtag and country keys are taken as returned.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, serde_json::Error> {
    serde_json::from_str(strip_code_fence(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r##"{"#travel": {"USA": 4200, "India": 3100}}"##;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strips_json_fence() {
        let wrapped = format!("```json\n{}\n```", BODY);
        assert_eq!(strip_code_fence(&wrapped), BODY);
    }

    #[test]
    fn test_strips_bare_fence() {
        let wrapped = format!("```\n{}\n```", BODY);
        assert_eq!(strip_code_fence(&wrapped), BODY);
    }

    #[test]
    fn test_strips_fence_without_closing_marker() {
        let wrapped = format!("```json {}", BODY);
        assert_eq!(strip_code_fence(&wrapped), BODY);
    }

    #[test]
    fn test_closing_fence_alone_is_kept() {
        let text = format!("{}\n```", BODY);
        assert_eq!(strip_code_fence(&text), text);
    }

    #[test]
    fn test_parses_fenced_reply() {
        let wrapped = format!("```json\n{}\n```", BODY);
        let result = parse_analysis(&wrapped).unwrap();
        assert_eq!(result["#travel"]["USA"], 4200);
        assert_eq!(result["#travel"]["India"], 3100);
    }

    #[test]
    fn test_keys_are_not_validated() {
        let result = parse_analysis(r##"{"#other": {"Mars": 10}}"##).unwrap();
        assert_eq!(result["#other"]["Mars"], 10);
    }

    #[test]
    fn test_rejects_prose() {
        assert!(parse_analysis("Sure! Here is the data you asked for.").is_err());
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(parse_analysis("[1, 2, 3]").is_err());
        assert!(parse_analysis(r##"{"#a": 12}"##).is_err());
        assert!(parse_analysis(r##"{"#a": {"USA": "lots"}}"##).is_err());
        assert!(parse_analysis(r##"{"#a": {"USA": -5}}"##).is_err());
    }
}
