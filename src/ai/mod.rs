//! Generative text-completion clients.
//!
//! The extractor only needs "prompt in, text out", so the seam is a single
//! async trait. `GeminiClient` talks to the real service; `DisabledClient`
//! stands in when no API key is configured.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service is not configured (set GEMINI_API_KEY)")]
    NotConfigured,

    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion service returned no text")]
    EmptyResponse,
}

/// A service that continues a text prompt.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` once and returns the raw text of the reply.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Placeholder client for deployments without credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledClient;

#[async_trait]
impl CompletionClient for DisabledClient {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured)
    }
}
