//! Text helpers shared by the reference fetcher and both generators.

/// Split text into sentences.
///
/// A sentence boundary is a `.`, `!` or `?` followed by whitespace and then an
/// ASCII uppercase letter or digit. This is a heuristic, not a parser:
/// multi-sentence abbreviations ("U.S. Navy") may split incorrectly, which is
/// acceptable for summary material.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (index, ch) = chars[i];
        if matches!(ch, '.' | '!' | '?') {
            let mut next = i + 1;
            while next < chars.len() && chars[next].1.is_whitespace() {
                next += 1;
            }
            let crossed_whitespace = next > i + 1;
            if crossed_whitespace && next < chars.len() {
                let follower = chars[next].1;
                if follower.is_ascii_uppercase() || follower.is_ascii_digit() {
                    push_fragment(&mut sentences, &text[start..index + ch.len_utf8()]);
                    start = chars[next].0;
                    i = next;
                    continue;
                }
            }
        }
        i += 1;
    }

    push_fragment(&mut sentences, &text[start..]);
    sentences
}

fn push_fragment(sentences: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// Uppercase the first character of the trimmed text, leaving the rest as-is.
pub fn force_sentence_case(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Truncate text to at most `max_chars` characters, appending an ellipsis
/// when content was dropped.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", head.trim_end())
}
