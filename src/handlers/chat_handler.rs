//! Chat handler: records the user turn, calls the completion service, and
//! relays the reply (chunked when oversized).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::chunker::{send_chunked, MAX_MESSAGE_LEN};
use crate::conversation::ConversationStore;
use crate::core::{Bot, Handler, HandlerResponse, Message, Result};
use crate::llm::CompletionClient;
use crate::texts::{MSG_COMPLETION_FAILED, MSG_LARGE_RESPONSE};

/// Terminal handler for plain conversation turns. A completion failure leaves
/// the pending user turn in history (no assistant turn) and reports a fixed
/// error message; the next turn continues from there.
pub struct ChatHandler {
    bot: Arc<dyn Bot>,
    store: ConversationStore,
    completions: Arc<dyn CompletionClient>,
}

impl ChatHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: ConversationStore,
        completions: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            bot,
            store,
            completions,
        }
    }

    async fn send_reply(&self, message: &Message, reply: &str) -> Result<()> {
        if reply.chars().count() > MAX_MESSAGE_LEN {
            self.bot.send_message(&message.chat, MSG_LARGE_RESPONSE).await?;
            send_chunked(self.bot.as_ref(), &message.chat, reply, MAX_MESSAGE_LEN).await
        } else {
            self.bot.send_message(&message.chat, reply).await
        }
    }
}

#[async_trait]
impl Handler for ChatHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.content.is_empty() {
            info!(user_id = message.user.id, "step: empty message ignored");
            return Ok(HandlerResponse::Stop);
        }

        let user_id = message.user.id;
        let system_prompt = self.store.system_prompt(user_id).await;
        let history = self
            .store
            .append_user_turn(user_id, &message.content, &system_prompt)
            .await;

        // Best-effort "working" signal while the completion call is outstanding.
        if let Err(e) = self.bot.indicate_typing(&message.chat).await {
            warn!(error = %e, user_id, "Typing indicator failed");
        }

        let reply = match self.completions.complete(&history).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, user_id, "Completion request failed");
                self.bot.send_message(&message.chat, MSG_COMPLETION_FAILED).await?;
                return Ok(HandlerResponse::Stop);
            }
        };

        self.store.append_assistant_turn(user_id, &reply).await;
        info!(
            user_id,
            reply_len = reply.len(),
            "step: completion received, relaying reply"
        );
        self.send_reply(message, &reply).await?;
        Ok(HandlerResponse::Reply(reply))
    }
}
