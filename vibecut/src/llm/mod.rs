//! Planning-model abstraction.
//!
//! The Planner depends on a callable that turns a message list into assistant text; this
//! module defines the trait, an OpenAI-compatible client and a mock.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::message::Message;

/// Token usage for one call.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Assistant reply plus optional usage.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    pub content: String,
    pub usage: Option<LlmUsage>,
}

/// Planning collaborator: one request, one reply.
///
/// **Interaction**: called once per `Planner::plan`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, CollaboratorError>;
}
