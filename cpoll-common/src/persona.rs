//! Persona completion seam
//!
//! After submitting, a respondent may ask the campaign persona questions.
//! Answers come from an external completion service behind
//! [`PersonaCompleter`]; the server provides the HTTP client.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ValidationErrors;
use crate::Result;

/// Fixed system preamble sent with every question
pub const PERSONA_PREAMBLE: &str = "You are Dr. Abdulrasheed Nuideen Romeo, a 48-year-old APC politician, \
real estate expert, and mentor from Osun State, Nigeria. Respond in a professional, positive, and \
engaging tone, as if addressing a constituent personally. Focus on your vision for Osun State, \
leadership, and community development.";

/// Shown in place of an answer when the completion service fails
pub const FALLBACK_ANSWER: &str = "Error fetching response. Please try again.";

/// Suggested follow-up questions
pub const SUGGESTION_POOL: [&str; 8] = [
    "More about Dr. Abdulrasheed",
    "What Dr. Abdulrasheed Stands for",
    "How will Dr. Abdulrasheed better Osun state",
    "Dr. Abdulrasheed\u{2019}s Achievements",
    "Vision for 2027",
    "Policies on Economy",
    "Community Impact in Osun",
    "Real Estate Initiatives",
];

/// Number of suggestions offered at a time
pub const SUGGESTION_COUNT: usize = 4;

/// Generates persona answers
#[async_trait]
pub trait PersonaCompleter: Send + Sync {
    /// Answer `question` in the persona's voice
    ///
    /// `Error::Validation` for an empty question; `Error::Upstream` when the
    /// service fails or times out. Single attempt, no retry.
    async fn complete(&self, question: &str) -> Result<String>;
}

/// Reject empty or whitespace-only questions
pub fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("questionText", "Question is required");
        return Err(errors.into());
    }
    Ok(trimmed)
}

/// Pick distinct suggestions from the pool
pub fn suggest_questions<R: Rng + ?Sized>(rng: &mut R) -> Vec<&'static str> {
    SUGGESTION_POOL
        .choose_multiple(rng, SUGGESTION_COUNT)
        .copied()
        .collect()
}
