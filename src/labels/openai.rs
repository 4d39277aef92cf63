//! OpenAI-compatible chat completions provider.

use crate::config::LabelerConfig;
use crate::error::{Error, Result};
use crate::traits::{CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completions request body.
///
/// `stop` is always omitted.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// Provider for `POST /v1/chat/completions`.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Build a provider from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured, so callers can run
    /// with labeling disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &LabelerConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Some(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: &request.prompt }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            n: 1,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Completion(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&text) {
                return Err(Error::Completion(format!(
                    "provider error ({status}): {}",
                    api_error.error.message
                )));
            }
            return Err(Error::Completion(format!("provider error ({status}): {text}")));
        }

        parse_chat_response(&text)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Extract the first choice's content from a chat completions response.
fn parse_chat_response(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Completion(format!("malformed response: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::Completion("response has no message content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_key_is_none() {
        let config = LabelerConfig { api_key: None, ..LabelerConfig::default() };
        assert!(OpenAiProvider::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_blank_key_is_none() {
        let config = LabelerConfig { api_key: Some("   ".to_string()), ..LabelerConfig::default() };
        assert!(OpenAiProvider::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_with_key() {
        let config = LabelerConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            ..LabelerConfig::default()
        };
        let provider = OpenAiProvider::from_config(&config).unwrap().unwrap();
        assert_eq!(provider.model, "gpt-4o-mini");
        assert_eq!(provider.name(), "openai");
        assert!(!format!("{provider:?}").contains("sk-test"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            max_tokens: 20,
            temperature: 0.5,
            n: 1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 20);
        assert_eq!(json["n"], 1);
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{
            "id": "chatcmpl-xxxxx",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "finish_reason": "stop",
                 "message": {"role": "assistant", "content": "work, urgent"}}
            ]
        }"#;
        assert_eq!(parse_chat_response(body).unwrap(), "work, urgent");
    }

    #[test]
    fn test_parse_chat_response_without_choices() {
        let err = parse_chat_response(r#"{"choices": []}"#).unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn test_parse_chat_response_malformed() {
        let err = parse_chat_response("not json").unwrap_err();
        assert!(matches!(err, Error::Completion(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let config = LabelerConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout_secs: 2,
            ..LabelerConfig::default()
        };
        let provider = OpenAiProvider::from_config(&config).unwrap().unwrap();
        let request =
            CompletionRequest { prompt: "hi".to_string(), max_tokens: 5, temperature: 0.2 };

        let result = provider.complete(&request).await;
        assert!(matches!(result, Err(Error::Completion(_))));
    }
}
