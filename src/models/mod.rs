//! Core data structures shared across the crate.
//!
//! - [`SourceDocument`]: normalized reference material for a topic
//! - [`StudyPackage`]: the generated output for a request
//! - [`StudyRequest`]: caller-supplied generation parameters

mod package;
mod source;

pub use package::{QuizQuestion, StudyMode, StudyPackage, StudyPayload, StudyRequest};
pub use source::{Attribution, SourceDocument};
