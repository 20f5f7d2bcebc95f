//! Deterministic rule-based generator: the fallback tier.
//!
//! Builds a study package purely from the source document, without any AI
//! call. Output is deterministic modulo the injected RNG, which drives
//! distractor draws and option shuffles. Math mode always fails here: this
//! tier has no quantitative reasoning capability.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::generator::{display_topic, GenerationError};
use crate::models::{
    QuizQuestion, SourceDocument, StudyMode, StudyPackage, StudyPayload, StudyRequest,
};
use crate::utils::{force_sentence_case, truncate};

/// Character budget for each summary entry
const SUMMARY_CHAR_BUDGET: usize = 220;

/// Generic wrong-domain statements used as quiz distractors. Each is adapted
/// to the topic before use; a templated filler takes over once the pool is
/// exhausted.
const GENERIC_DISTRACTORS: [&str; 7] = [
    "It is primarily a concept from modern pop culture.",
    "It deals exclusively with culinary arts and cooking techniques.",
    "It is mostly focused on professional sports trivia.",
    "It originated as a fictional idea in a popular novel.",
    "It is known chiefly as a style of contemporary music.",
    "It refers to a recent social media trend.",
    "It is concerned only with interior design aesthetics.",
];

/// Generate a study package from the source document alone.
pub fn generate<R: Rng + ?Sized>(
    request: &StudyRequest,
    source: &SourceDocument,
    rng: &mut R,
) -> Result<StudyPackage, GenerationError> {
    if request.mode == StudyMode::Math {
        return Err(GenerationError::MathModeRequiresAi);
    }

    let topic = display_topic(source, &request.topic);
    let summary = build_summary(source, &topic);
    let quiz = build_quiz(&summary, &topic, rng);
    let study_tip = build_study_tip(&summary, &topic);

    Ok(StudyPackage {
        topic,
        mode: request.mode,
        generated_at: Utc::now(),
        payload: StudyPayload::Standard {
            summary,
            quiz,
            study_tip,
        },
    })
}

/// Always exactly 3 entries, each within the character budget.
fn build_summary(source: &SourceDocument, topic: &str) -> Vec<String> {
    let sentences = &source.sentences;

    if sentences.len() >= 3 {
        return sentences
            .iter()
            .take(3)
            .map(|sentence| truncate(sentence.trim(), SUMMARY_CHAR_BUDGET))
            .collect();
    }

    if sentences.is_empty() {
        let lead = if source.extract.trim().is_empty() {
            format!("{} is an area worth exploring further.", topic)
        } else {
            truncate(&source.extract, SUMMARY_CHAR_BUDGET)
        };
        return vec![
            lead,
            format!("Start by identifying the core ideas that define {}.", topic),
            format!("Look for examples of {} applied in real situations.", topic),
        ];
    }

    let mut padded = sentences.clone();
    while padded.len() < 3 {
        padded.push(format!(
            "Explore additional aspects of {} to reinforce this point.",
            topic
        ));
    }
    padded
        .iter()
        .take(3)
        .map(|sentence| truncate(sentence.trim(), SUMMARY_CHAR_BUDGET))
        .collect()
}

fn build_quiz<R: Rng + ?Sized>(summary: &[String], topic: &str, rng: &mut R) -> Vec<QuizQuestion> {
    let mut pool: Vec<&str> = GENERIC_DISTRACTORS.to_vec();
    let mut questions = Vec::with_capacity(3);

    for (index, fact) in summary.iter().enumerate().take(3) {
        let mut options: Vec<String> = Vec::with_capacity(4);
        options.push(fact.clone());
        options.extend(draw_distractors(&mut pool, 3, topic, rng));
        options.shuffle(rng);

        let correct_index = options
            .iter()
            .position(|option| option == fact)
            .unwrap_or_default();

        questions.push(QuizQuestion {
            prompt: quiz_prompt(index, topic),
            options,
            correct_index,
            explanation: format!(
                "The accurate statement is “{}”. This detail reflects what reliable sources say about {}.",
                fact, topic
            ),
        });
    }

    questions
}

fn quiz_prompt(index: usize, topic: &str) -> String {
    match index % 3 {
        0 => format!("Which statement about {} is accurate?", topic),
        1 => format!("What is a key takeaway about {}?", topic),
        _ => format!("Which of these facts correctly relates to {}?", topic),
    }
}

/// Draw without replacement from the distractor pool, adapting each entry to
/// the topic; fall back to a templated filler once the pool runs dry.
fn draw_distractors<R: Rng + ?Sized>(
    pool: &mut Vec<&str>,
    count: usize,
    topic: &str,
    rng: &mut R,
) -> Vec<String> {
    let mut results = Vec::with_capacity(count);

    while results.len() < count && !pool.is_empty() {
        let candidate = pool.remove(rng.gen_range(0..pool.len()));
        results.push(adapt_distractor(candidate, topic));
    }

    while results.len() < count {
        results.push(format!(
            "{} still has more to explore.",
            force_sentence_case(topic)
        ));
    }

    results
}

/// Heuristic string substitution; not grammatically robust, which is
/// acceptable for fallback quality.
fn adapt_distractor(candidate: &str, topic: &str) -> String {
    candidate
        .replacen("It", &force_sentence_case(topic), 1)
        .replacen(" it ", &format!(" {} ", topic), 1)
}

fn build_study_tip(summary: &[String], topic: &str) -> String {
    let primary = summary
        .first()
        .cloned()
        .unwrap_or_else(|| format!("the central ideas of {}", topic));
    format!(
        "Create a quick concept map that links “{}” to supporting examples. Teaching {} aloud to a friend or an empty room consolidates your understanding.",
        primary, topic
    )
}
