//! Mock planning model for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;

/// Mock LLM: returns canned replies in order, repeating the last one.
///
/// Optional failure mode returns the same error on every call. Records the call count and
/// the most recent message list so tests can inspect the rendered prompt.
pub struct MockLlm {
    replies: Vec<String>,
    failure: Option<CollaboratorError>,
    /// Calls that fail with `failure` before replies start (transient failure simulation).
    fail_first: usize,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<Message>>,
}

impl MockLlm {
    /// Always answers with `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self::sequence(vec![content.into()])
    }

    /// Answers with each reply in turn; the last one repeats.
    pub fn sequence(replies: Vec<String>) -> Self {
        Self {
            replies,
            failure: None,
            fail_first: 0,
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with `error`.
    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            failure: Some(error),
            fail_first: usize::MAX,
            ..Self::sequence(Vec::new())
        }
    }

    /// Fails the first `times` calls with `error`, then answers normally.
    pub fn failing_first(mut self, times: usize, error: CollaboratorError) -> Self {
        self.failure = Some(error);
        self.fail_first = times;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages passed to the most recent call.
    pub fn last_messages(&self) -> Vec<Message> {
        match self.last_messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, CollaboratorError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut guard = match self.last_messages.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *guard = messages.to_vec();
        }
        if let Some(ref err) = self.failure {
            if n < self.fail_first {
                return Err(err.clone());
            }
        }
        let reply_idx = n.saturating_sub(if self.failure.is_some() { self.fail_first } else { 0 });
        let content = self
            .replies
            .get(reply_idx)
            .or_else(|| self.replies.last())
            .cloned()
            .ok_or_else(|| CollaboratorError::MalformedResponse("mock has no replies".into()))?;
        Ok(LlmResponse {
            content,
            usage: None,
        })
    }
}
