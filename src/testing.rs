//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]

use crate::error::{Error, Result};
use crate::traits::{CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// A scripted reply from the mock provider.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure(String),
    Delayed(Duration, String),
}

/// A mock completion provider for testing.
///
/// Replies are queued with [`expect_reply`](Self::expect_reply) and
/// [`expect_error`](Self::expect_error) and consumed in order. Every call is
/// recorded so tests can assert how many outbound requests were made.
#[derive(Debug, Default)]
pub struct MockCompletionProvider {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionProvider {
    /// Create a new mock provider with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply with the given raw text.
    pub fn expect_reply(&self, text: &str) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Reply::Text(text.to_string()));
    }

    /// Queue a successful reply that arrives only after `delay`.
    ///
    /// The call is recorded before the delay starts, so
    /// [`call_count`](Self::call_count) shows a request in flight.
    pub fn expect_reply_after(&self, delay: Duration, text: &str) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Reply::Delayed(delay, text.to_string()));
    }

    /// Queue a failing reply.
    pub fn expect_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Reply::Failure(message.to_string()));
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Verify all scripted replies were consumed.
    ///
    /// # Panics
    ///
    /// Panics if replies remain queued.
    pub fn verify(&self) {
        let remaining = self.replies.lock().unwrap_or_else(PoisonError::into_inner).len();
        assert_eq!(remaining, 0, "{remaining} scripted replies were never requested");
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        let reply = self.replies.lock().unwrap_or_else(PoisonError::into_inner).pop_front();

        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Failure(message)) => Err(Error::Completion(message)),
            Some(Reply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => panic!("Unexpected completion call: no more scripted replies"),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
