//! OpenAI Chat Completions client implementing [`LlmClient`].
//!
//! Works against any OpenAI-compatible endpoint; set the base URL through
//! [`ChatOpenAI::from_settings`] (`OPENAI_BASE_URL`) or a custom [`OpenAIConfig`].

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use config::Settings;
use tracing::{debug, trace};

use crate::error::CollaboratorError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage};
use crate::message::Message;

/// Planner temperature when none is set. Low for stable plans.
const DEFAULT_TEMPERATURE: f32 = 0.2;

pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }

    /// Key, optional base URL and model from validated settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(settings.openai_api_key());
        if let Some(base) = settings.openai_base_url() {
            config = config.with_api_base(base);
        }
        Self::with_config(config, settings.planner_model())
    }

    /// Temperature (0–2); `None` leaves the API default.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant(s) => {
                    ChatCompletionRequestMessage::Assistant((s.as_str()).into())
                }
            })
            .collect()
    }
}

fn map_openai_error(err: OpenAIError) -> CollaboratorError {
    match err {
        OpenAIError::ApiError(api) => CollaboratorError::Rejected(format!("OpenAI API error: {}", api)),
        e @ OpenAIError::JSONDeserialize(..) => {
            CollaboratorError::MalformedResponse(format!("OpenAI response: {}", e))
        }
        e => CollaboratorError::Transport(format!("OpenAI request failed: {}", e)),
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, CollaboratorError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages));
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        let request = args.build().map_err(|e| {
            CollaboratorError::Rejected(format!("OpenAI request build failed: {}", e))
        })?;

        debug!(
            model = %self.model,
            message_count = messages.len(),
            temperature = ?self.temperature,
            "OpenAI chat create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(request = %js, "OpenAI request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let usage = response.usage.as_ref().map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            CollaboratorError::MalformedResponse("OpenAI returned no choices".to_string())
        })?;
        let content = choice.message.content.unwrap_or_default();
        debug!(content_len = content.len(), usage = ?usage, "OpenAI chat done");

        Ok(LlmResponse { content, usage })
    }
}
