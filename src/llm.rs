//! Completion gateway: invokes the chat-completion service and collapses its
//! failure modes into one opaque error.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::conversation::{Role, Turn};

/// Single failure signal for the completion boundary. Timeouts, rate limits,
/// malformed responses, oversized contexts, and outages are not distinguished
/// here; callers see one generic failure.
#[derive(Error, Debug)]
#[error("completion request failed: {0}")]
pub struct CompletionError(pub String);

/// Abstraction over the completion service: ordered turns in, assistant text
/// out. No streaming, no tools. Tests substitute a scripted implementation.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, turns: &[Turn]) -> std::result::Result<String, CompletionError>;
}

/// OpenAI-backed completion client. Temperature is fixed at 0.
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            model,
        }
    }

    /// Client against a non-default API base (e.g. a proxy).
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model,
        }
    }

    fn to_request_message(
        turn: &Turn,
    ) -> std::result::Result<ChatCompletionRequestMessage, CompletionError> {
        let msg = match turn.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(turn.content.as_str())
                .build()
                .map_err(|e| CompletionError(e.to_string()))?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(turn.content.as_str())
                .build()
                .map_err(|e| CompletionError(e.to_string()))?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.content.as_str())
                .build()
                .map_err(|e| CompletionError(e.to_string()))?
                .into(),
        };
        Ok(msg)
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, turns: &[Turn]) -> std::result::Result<String, CompletionError> {
        let messages = turns
            .iter()
            .map(Self::to_request_message)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| CompletionError(e.to_string()))?;

        info!(model = %self.model, turn_count = turns.len(), "step: submitting completion request");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| CompletionError(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| CompletionError("no content in response".to_string()))
    }
}
