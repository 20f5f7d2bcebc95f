//! Extraction of usable content from model responses.
//!
//! The generateContent service has produced several response shapes over
//! time (top-level text fields, candidate/part nesting). Rather than a
//! cascade of ad hoc conditionals, text extraction is an ordered table of
//! pure strategies; the first one yielding non-empty text wins.
//!
//! The extracted text then goes through JSON repair: models frequently wrap
//! their JSON in markdown fences or commentary despite instructions not to.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

type TextStrategy = fn(&Value) -> Option<String>;

/// Ordered extraction strategies, most specific first.
const TEXT_STRATEGIES: &[TextStrategy] = &[
    top_level_text,
    top_level_output_text,
    candidate_output_text,
    candidate_parts_text,
];

/// Pull the first non-empty text content out of a model response.
pub fn extract_text(response: &Value) -> Option<String> {
    TEXT_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(response).filter(|text| !text.trim().is_empty()))
}

fn top_level_text(response: &Value) -> Option<String> {
    string_field(response, "text")
}

fn top_level_output_text(response: &Value) -> Option<String> {
    string_field(response, "output_text").or_else(|| string_field(response, "outputText"))
}

fn candidate_output_text(response: &Value) -> Option<String> {
    string_field(first_candidate(response)?, "output_text")
}

fn candidate_parts_text(response: &Value) -> Option<String> {
    let parts = first_candidate(response)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    parts
        .iter()
        .filter_map(|part| string_field(part, "text"))
        .find(|text| !text.trim().is_empty())
}

/// Candidates appear either at the top level (REST body) or nested under a
/// `response` wrapper (SDK-style result objects).
fn first_candidate(response: &Value) -> Option<&Value> {
    response
        .get("candidates")
        .or_else(|| response.get("response")?.get("candidates"))?
        .as_array()?
        .first()
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field)?.as_str().map(str::to_string)
}

/// Extract a JSON object from model text.
///
/// Tries, in order: the content of a fenced ```json block, the whole trimmed
/// text, and the slice from the first `{` to the last `}`. The first attempt
/// that parses wins.
pub fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(captures) = json_fence().captures(trimmed) {
        if let Ok(value) = serde_json::from_str(captures[1].trim()) {
            return Some(value);
        }
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let first = trimmed.find('{')?;
    let last = trimmed.rfind('}')?;
    if last <= first {
        return None;
    }
    serde_json::from_str(&trimmed[first..=last]).ok()
}

fn json_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?si)```json\s*(.*?)```").expect("fence pattern is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_text_wins() {
        let response = json!({ "text": "direct" });
        assert_eq!(extract_text(&response).as_deref(), Some("direct"));
    }

    #[test]
    fn test_output_text_variants() {
        assert_eq!(
            extract_text(&json!({ "output_text": "snake" })).as_deref(),
            Some("snake")
        );
        assert_eq!(
            extract_text(&json!({ "outputText": "camel" })).as_deref(),
            Some("camel")
        );
    }

    #[test]
    fn test_candidate_parts_first_non_empty() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "  " }, { "text": "from parts" }] } }
            ]
        });
        assert_eq!(extract_text(&response).as_deref(), Some("from parts"));
    }

    #[test]
    fn test_candidates_nested_under_response() {
        let response = json!({
            "response": {
                "candidates": [
                    { "content": { "parts": [{ "text": "nested" }] } }
                ]
            }
        });
        assert_eq!(extract_text(&response).as_deref(), Some("nested"));
    }

    #[test]
    fn test_empty_text_skipped_in_favor_of_later_strategy() {
        let response = json!({
            "text": "   ",
            "candidates": [
                { "content": { "parts": [{ "text": "fallback" }] } }
            ]
        });
        assert_eq!(extract_text(&response).as_deref(), Some("fallback"));
    }

    #[test]
    fn test_no_text_anywhere() {
        assert!(extract_text(&json!({ "candidates": [] })).is_none());
        assert!(extract_text(&json!({})).is_none());
    }

    #[test]
    fn test_fenced_json_block() {
        let raw = "Here you go:\n```json\n{\"summary\": [\"a\"]}\n```\nEnjoy!";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["summary"][0], "a");
    }

    #[test]
    fn test_fenced_block_case_insensitive() {
        let raw = "```JSON\n{\"x\": 1}\n```";
        assert_eq!(extract_json(raw).unwrap()["x"], 1);
    }

    #[test]
    fn test_bare_json_parses_identically_to_fenced() {
        let body = "{\"summary\": [\"a\", \"b\", \"c\"], \"studyTip\": \"tip\"}";
        let fenced = format!("```json\n{}\n```", body);
        assert_eq!(extract_json(body).unwrap(), extract_json(&fenced).unwrap());
    }

    #[test]
    fn test_brace_slice_recovers_from_commentary() {
        let raw = "Sure! The answer is {\"question\": \"2+2?\", \"answer\": \"4\"} as requested.";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["answer"], "4");
    }

    #[test]
    fn test_unparseable_text_yields_none() {
        assert!(extract_json("no json here").is_none());
        assert!(extract_json("").is_none());
        assert!(extract_json("{broken").is_none());
    }
}
