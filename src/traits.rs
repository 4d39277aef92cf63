//! Core traits for testability and abstraction.

use crate::error::Result;
use async_trait::async_trait;

/// A single text-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The user prompt.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature (low values are close to deterministic).
    pub temperature: f32,
}

/// Trait for an external text-completion service.
///
/// This trait abstracts the language-model call for testability.
/// The production implementation talks to an OpenAI-compatible endpoint,
/// while tests use a scripted mock.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request exactly one completion for the given request.
    ///
    /// # Returns
    ///
    /// The raw text of the first completion choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the provider reports an error,
    /// or the response cannot be parsed.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Short provider name for logging.
    fn name(&self) -> &'static str;
}
