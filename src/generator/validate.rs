//! Schema validation for model output.
//!
//! The model replies with loose JSON; these validators coerce it into a
//! [`StudyPayload`] or fail naming the offending field. All strings are
//! trimmed before acceptance.

use serde_json::Value;

use crate::ai::AiError;
use crate::models::{QuizQuestion, StudyPayload};

/// Validate math-mode output: question, answer and explanation must all be
/// non-empty strings.
pub(crate) fn math_payload(value: &Value) -> Result<StudyPayload, AiError> {
    let question = require_string(value.get("question"), "response missing math question")?;
    let answer = require_string(value.get("answer"), "response missing math answer")?;
    let explanation = require_string(value.get("explanation"), "response missing math explanation")?;

    Ok(StudyPayload::Math {
        question,
        answer,
        explanation,
    })
}

/// Validate standard-mode output: 3 summary entries, 3 normalized quiz
/// questions and a study tip.
pub(crate) fn standard_payload(value: &Value) -> Result<StudyPayload, AiError> {
    let summary: Vec<String> =
        require_strings(value.get("summary"), 3, "response missing summary items")?
            .into_iter()
            .take(3)
            .collect();
    let quiz = normalize_quiz(value.get("quiz"))?;
    let study_tip = require_string(value.get("studyTip"), "response missing study tip")?;

    Ok(StudyPayload::Standard {
        summary,
        quiz,
        study_tip,
    })
}

fn normalize_quiz(value: Option<&Value>) -> Result<Vec<QuizQuestion>, AiError> {
    let entries = value
        .and_then(Value::as_array)
        .filter(|entries| entries.len() >= 3)
        .ok_or_else(|| AiError::InvalidResponse("response missing quiz questions".to_string()))?;

    entries
        .iter()
        .take(3)
        .enumerate()
        .map(|(index, entry)| normalize_question(index + 1, entry))
        .collect()
}

fn normalize_question(number: usize, entry: &Value) -> Result<QuizQuestion, AiError> {
    let prompt = require_string(
        entry.get("prompt"),
        &format!("quiz question {} missing prompt", number),
    )?;

    let options: Vec<String> = require_strings(
        entry.get("options"),
        4,
        &format!("quiz question {} missing options", number),
    )?
    .into_iter()
    .take(4)
    .collect();

    let correct_index = entry
        .get("correctIndex")
        .and_then(Value::as_i64)
        .unwrap_or(-1);
    if correct_index < 0 || correct_index as usize >= options.len() {
        return Err(AiError::InvalidResponse(format!(
            "quiz question {} has an invalid correctIndex",
            number
        )));
    }

    let explanation = require_string(
        entry.get("explanation"),
        &format!("quiz question {} missing explanation", number),
    )?;

    Ok(QuizQuestion {
        prompt,
        options,
        correct_index: correct_index as usize,
        explanation,
    })
}

fn require_string(value: Option<&Value>, message: &str) -> Result<String, AiError> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AiError::InvalidResponse(message.to_string()))
}

fn require_strings(
    value: Option<&Value>,
    min_len: usize,
    message: &str,
) -> Result<Vec<String>, AiError> {
    let items = value
        .and_then(Value::as_array)
        .filter(|items| items.len() >= min_len)
        .ok_or_else(|| AiError::InvalidResponse(message.to_string()))?;

    items
        .iter()
        .map(|item| require_string(Some(item), message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_standard() -> Value {
        json!({
            "summary": ["First point.", "Second point.", "Third point."],
            "quiz": [
                {
                    "prompt": "Q1?",
                    "options": ["a", "b", "c", "d"],
                    "correctIndex": 0,
                    "explanation": "Because a."
                },
                {
                    "prompt": "Q2?",
                    "options": ["a", "b", "c", "d"],
                    "correctIndex": 1,
                    "explanation": "Because b."
                },
                {
                    "prompt": "Q3?",
                    "options": ["a", "b", "c", "d"],
                    "correctIndex": 3,
                    "explanation": "Because d."
                }
            ],
            "studyTip": "Review in the morning."
        })
    }

    #[test]
    fn test_valid_standard_payload() {
        let payload = standard_payload(&valid_standard()).unwrap();
        let StudyPayload::Standard {
            summary,
            quiz,
            study_tip,
        } = payload
        else {
            panic!("expected standard payload");
        };
        assert_eq!(summary.len(), 3);
        assert_eq!(quiz.len(), 3);
        assert_eq!(study_tip, "Review in the morning.");
    }

    #[test]
    fn test_missing_study_tip_names_the_field() {
        let mut value = valid_standard();
        value.as_object_mut().unwrap().remove("studyTip");
        let error = standard_payload(&value).unwrap_err();
        assert!(error.to_string().contains("study tip"));
    }

    #[test]
    fn test_blank_study_tip_rejected() {
        let mut value = valid_standard();
        value["studyTip"] = json!("   ");
        assert!(standard_payload(&value).is_err());
    }

    #[test]
    fn test_short_summary_fails() {
        let mut value = valid_standard();
        value["summary"] = json!(["only", "two"]);
        let error = standard_payload(&value).unwrap_err();
        assert!(error.to_string().contains("summary"));
    }

    #[test]
    fn test_extra_summary_items_trimmed_to_three() {
        let mut value = valid_standard();
        value["summary"] = json!(["a", "b", "c", "d", "e"]);
        let StudyPayload::Standard { summary, .. } = standard_payload(&value).unwrap() else {
            panic!("expected standard payload");
        };
        assert_eq!(summary.len(), 3);
    }

    #[test]
    fn test_out_of_range_correct_index_fails_that_question() {
        let mut value = valid_standard();
        value["quiz"][1]["correctIndex"] = json!(4);
        let error = standard_payload(&value).unwrap_err();
        assert!(error.to_string().contains("quiz question 2"));
        assert!(error.to_string().contains("correctIndex"));
    }

    #[test]
    fn test_non_integer_correct_index_fails() {
        let mut value = valid_standard();
        value["quiz"][0]["correctIndex"] = json!("first");
        assert!(standard_payload(&value).is_err());
    }

    #[test]
    fn test_five_options_trimmed_to_four() {
        let mut value = valid_standard();
        value["quiz"][0]["options"] = json!(["a", "b", "c", "d", "e"]);
        let StudyPayload::Standard { quiz, .. } = standard_payload(&value).unwrap() else {
            panic!("expected standard payload");
        };
        assert_eq!(quiz[0].options.len(), 4);
    }

    #[test]
    fn test_three_options_fail() {
        let mut value = valid_standard();
        value["quiz"][2]["options"] = json!(["a", "b", "c"]);
        let error = standard_payload(&value).unwrap_err();
        assert!(error.to_string().contains("quiz question 3"));
    }

    #[test]
    fn test_strings_are_trimmed() {
        let value = json!({
            "question": "  What is 2 + 2?  ",
            "answer": " 4 ",
            "explanation": " Add them. "
        });
        let StudyPayload::Math {
            question, answer, ..
        } = math_payload(&value).unwrap()
        else {
            panic!("expected math payload");
        };
        assert_eq!(question, "What is 2 + 2?");
        assert_eq!(answer, "4");
    }

    #[test]
    fn test_math_missing_answer_names_the_field() {
        let value = json!({ "question": "What is 2 + 2?", "explanation": "Add them." });
        let error = math_payload(&value).unwrap_err();
        assert!(error.to_string().contains("math answer"));
    }
}
