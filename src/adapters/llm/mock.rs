//! Mock LLM provider for testing.
//!
//! Configurable mock implementation of the `LlmProvider` port, allowing
//! tests to run without calling a real inference API.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Error injection for resilience testing
//! - Request capture for verification

use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{CompletionRequest, LlmError, LlmProvider, TokenStream};

/// A configured mock reply.
#[derive(Debug, Clone)]
enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail with this error.
    Error(MockLlmError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockLlmError {
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate a network error.
    Network { message: String },
    /// Simulate a timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockLlmError> for LlmError {
    fn from(err: MockLlmError) -> Self {
        match err {
            MockLlmError::Unavailable { message } => LlmError::unavailable(message),
            MockLlmError::RateLimited { retry_after_secs } => {
                LlmError::rate_limited(retry_after_secs)
            }
            MockLlmError::Network { message } => LlmError::network(message),
            MockLlmError::Timeout { timeout_secs } => LlmError::Timeout { timeout_secs },
        }
    }
}

/// Mock LLM provider for testing.
///
/// Replies are consumed in queue order; an exhausted queue reports the
/// backend as unavailable so a test that under-queues fails loudly.
#[derive(Debug, Clone, Default)]
pub struct MockLlmProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmProvider {
    /// Creates a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful text reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(content.into()));
        self
    }

    /// Queues an unavailable error.
    pub fn with_unavailable(self, message: impl Into<String>) -> Self {
        self.with_error(MockLlmError::Unavailable {
            message: message.into(),
        })
    }

    /// Queues an error reply.
    pub fn with_error(self, error: MockLlmError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Error(error));
        self
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_reply(&self) -> Result<String, LlmError> {
        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(err)) => Err(err.into()),
            None => Err(LlmError::unavailable("mock: reply queue exhausted")),
        }
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.next_reply()
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<TokenStream, LlmError> {
        self.requests.lock().unwrap().push(request);
        let text = self.next_reply()?;
        let fragments: Vec<Result<String, LlmError>> = text
            .split_inclusive(' ')
            .map(|s| Ok(s.to_string()))
            .collect();
        Ok(Box::pin(stream::iter(fragments)))
    }
}
