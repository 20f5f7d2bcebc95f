//! Free-text answer comparison for quantitative questions.
//!
//! Compares a user's answer against the canonical answer after aggressive
//! normalization, with a numeric-tolerance fallback that absorbs formatting
//! differences like "6" vs "6.0". No partial credit and no unit conversion.

use regex::Regex;
use std::sync::OnceLock;

/// Tolerance for numeric comparison
const NUMERIC_TOLERANCE: f64 = 1e-4;

/// Whether two answers should be treated as equivalent.
pub fn equivalent(user_answer: &str, canonical_answer: &str) -> bool {
    let user = normalize(user_answer);
    let canonical = normalize(canonical_answer);

    if user == canonical {
        return true;
    }

    match (leading_number(&user), leading_number(&canonical)) {
        (Some(a), Some(b)) => (a - b).abs() < NUMERIC_TOLERANCE,
        _ => false,
    }
}

/// Normalize an answer: lowercase, collapse whitespace, strip everything but
/// word characters / whitespace / periods / hyphens, drop standalone
/// "unit"/"units" tokens, and trim trailing periods.
fn normalize(answer: &str) -> String {
    let lowered = answer.to_lowercase();
    let collapsed = whitespace_runs().replace_all(lowered.trim(), " ");
    let stripped = disallowed_chars().replace_all(&collapsed, "");
    let without_units = unit_tokens().replace_all(&stripped, "");
    without_units.trim().trim_end_matches('.').to_string()
}

/// Parse a leading numeric prefix ("6 apples" parses as 6).
fn leading_number(text: &str) -> Option<f64> {
    let captures = numeric_prefix().captures(text.trim_start())?;
    captures[0].parse().ok()
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.-]").expect("char-class pattern is valid"))
}

fn unit_tokens() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(units?|unit)\b").expect("unit pattern is valid"))
}

fn numeric_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("number pattern is valid")
    })
}
