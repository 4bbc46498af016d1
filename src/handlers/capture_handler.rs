//! Capture handler: consumes messages that answer a pending prompt capture.
//!
//! Runs after the command handler and before the chat handler, so a captured
//! message is never also recorded as a conversation turn.

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::capture::PromptCaptureRegistry;
use crate::core::{Handler, HandlerResponse, Message, Result};

/// Offers each message to the capture registry; a claimed message stops the
/// chain. Messages outside any capture window pass through untouched.
pub struct CaptureHandler {
    captures: PromptCaptureRegistry,
}

impl CaptureHandler {
    pub fn new(captures: PromptCaptureRegistry) -> Self {
        Self { captures }
    }
}

#[async_trait]
impl Handler for CaptureHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if self
            .captures
            .claim(message.user.id, message.chat.id, &message.content)
            .await
        {
            info!(
                user_id = message.user.id,
                chat_id = message.chat.id,
                "step: message consumed by prompt capture"
            );
            return Ok(HandlerResponse::Stop);
        }
        Ok(HandlerResponse::Continue)
    }
}
