//! Question extraction: turns document text into a validated `QuestionSet`.
//!
//! The pipeline is prompt -> one completion call -> sanitize -> parse ->
//! locate -> validate -> bound. Only the completion call and JSON parsing
//! can fail; everything after parsing degrades to dropping entries, so a
//! bad batch shows up as an empty set rather than an error.

pub mod normalize;
pub mod prompt;
pub mod sanitize;

use std::sync::Arc;

use thiserror::Error;

use crate::ai::{CompletionClient, CompletionError};
use crate::models::question::QuestionSet;

pub use prompt::build_prompt;
pub use sanitize::sanitize;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("error generating questions: {0}")]
    Upstream(#[from] CompletionError),

    #[error("malformed model output: {0}")]
    MalformedOutput(#[source] serde_json::Error),
}

/// Result of parsing one model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuestions {
    pub questions: QuestionSet,
    /// Candidate entries that failed validation.
    pub rejected: usize,
}

/// Sanitizes, parses and validates raw model output.
///
/// Fails only when the sanitized text is not JSON. A JSON value of the
/// wrong shape gives an empty set.
pub fn parse_model_output(raw: &str) -> Result<ParsedQuestions, ExtractionError> {
    let cleaned = sanitize(raw);
    let parsed: serde_json::Value =
        serde_json::from_str(&cleaned).map_err(ExtractionError::MalformedOutput)?;

    let Some(candidates) = normalize::locate_questions(&parsed) else {
        tracing::warn!("Model output parsed but held no question array");
        return Ok(ParsedQuestions::default());
    };

    let valid: Vec<_> = candidates.iter().filter_map(normalize::normalize_entry).collect();
    let rejected = candidates.len() - valid.len();

    Ok(ParsedQuestions {
        questions: QuestionSet::from_validated(valid),
        rejected,
    })
}

/// Asks a completion service for quiz questions about a document.
#[derive(Clone)]
pub struct QuestionExtractor {
    client: Arc<dyn CompletionClient>,
}

impl QuestionExtractor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Runs the full pipeline once. No retries.
    pub async fn extract(&self, document_text: &str) -> Result<QuestionSet, ExtractionError> {
        let prompt = build_prompt(document_text);
        let raw = self.client.complete(&prompt).await?;

        let parsed = parse_model_output(&raw).inspect_err(|e| {
            tracing::warn!(raw_bytes = raw.len(), "Failed to parse model output: {}", e);
        })?;

        if parsed.rejected > 0 {
            tracing::warn!(
                rejected = parsed.rejected,
                kept = parsed.questions.len(),
                "Dropped invalid question entries from model output"
            );
        }
        tracing::info!(count = parsed.questions.len(), "Extracted questions");

        Ok(parsed.questions)
    }
}
