//! Label suggestion client.

use super::{parse_suggestion, OpenAiProvider, Suggestion};
use crate::config::LabelerConfig;
use crate::error::Result;
use crate::templates;
use crate::traits::{CompletionProvider, CompletionRequest};
use std::sync::Arc;

/// Asks a completion provider for task labels.
///
/// Without a provider the client is "unconfigured": [`LabelClient::suggest`]
/// returns [`Suggestion::NoLabels`] and makes no outbound call.
#[derive(Clone)]
pub struct LabelClient {
    provider: Option<Arc<dyn CompletionProvider>>,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for LabelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelClient")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LabelClient {
    /// Create a client backed by the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &LabelerConfig) -> Self {
        Self {
            provider: Some(provider),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Create a client for the configured OpenAI-compatible endpoint.
    ///
    /// Without an API key the client is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &LabelerConfig) -> Result<Self> {
        Ok(OpenAiProvider::from_config(config)?
            .map_or_else(Self::disabled, |provider| Self::new(Arc::new(provider), config)))
    }

    /// Create a client backed by `provider` if an API key is configured.
    ///
    /// Without a key the provider is dropped unused.
    #[must_use]
    pub fn with_provider(config: &LabelerConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        if config.api_key().is_none() {
            return Self::disabled();
        }
        Self::new(provider, config)
    }

    /// Create a client that never suggests labels.
    #[must_use]
    pub fn disabled() -> Self {
        let defaults = LabelerConfig::default();
        Self { provider: None, max_tokens: defaults.max_tokens, temperature: defaults.temperature }
    }

    /// Whether a provider is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Suggest labels for a task.
    ///
    /// Every failure (rendering the prompt, the provider call, an unusable
    /// reply) is logged and reported as [`Suggestion::NoLabels`].
    pub async fn suggest(&self, title: &str, description: Option<&str>) -> Suggestion {
        let Some(provider) = &self.provider else {
            return Suggestion::NoLabels;
        };

        let prompt = match templates::render_labels_prompt(title, description) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(error = %e, "could not render label prompt");
                return Suggestion::NoLabels;
            }
        };

        let request = CompletionRequest {
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match provider.complete(&request).await {
            Ok(raw) => {
                let suggestion = parse_suggestion(&raw);
                tracing::debug!(provider = provider.name(), ?suggestion, "label suggestion");
                suggestion
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "label suggestion failed");
                Suggestion::NoLabels
            }
        }
    }
}
