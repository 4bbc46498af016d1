//! Command handler: parses leading-sigil commands and dispatches them.
//!
//! Runs first in the chain, so a command message is never treated as a
//! conversation turn or offered to a pending capture. All command paths stop
//! the chain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::capture::{CaptureOutcome, PromptCaptureRegistry};
use crate::chunker::{send_chunked, MAX_MESSAGE_LEN};
use crate::commands::Command;
use crate::conversation::{ConversationStore, Role};
use crate::core::{Bot, Handler, HandlerResponse, Message, Result};
use crate::texts::{
    current_prompt_message, prompt_set_message, DEFAULT_SYSTEM_PROMPT, EXAMPLE_CONVERSATION,
    INSTRUCTIONS, MSG_CONV_CLEARED, MSG_INVALID_COMMAND, MSG_NO_CONVERSATION, MSG_NO_PROMPT_SET,
    MSG_NO_SYSTEM_PROMPT, MSG_PROMPT_REQUEST, MSG_SET_SYS_HINT, MSG_SYS_CLEARED,
};

/// Dispatches the fixed command table. The custom-prompt capture dialog is
/// driven from here: the handler suspends on the capture continuation while
/// other messages keep flowing through the chain in their own tasks.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    store: ConversationStore,
    captures: PromptCaptureRegistry,
    capture_timeout: Duration,
}

impl CommandHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: ConversationStore,
        captures: PromptCaptureRegistry,
        capture_timeout: Duration,
    ) -> Self {
        Self {
            bot,
            store,
            captures,
            capture_timeout,
        }
    }

    async fn show_system_prompt(&self, message: &Message) -> Result<()> {
        let prompt = self.store.system_prompt(message.user.id).await;
        // The default prompt alone exceeds the message limit, so chunk.
        send_chunked(
            self.bot.as_ref(),
            &message.chat,
            &current_prompt_message(&prompt),
            MAX_MESSAGE_LEN,
        )
        .await
    }

    async fn set_default_prompt(&self, message: &Message) -> Result<()> {
        self.store
            .set_system_prompt(message.user.id, DEFAULT_SYSTEM_PROMPT)
            .await;
        send_chunked(
            self.bot.as_ref(),
            &message.chat,
            &prompt_set_message(DEFAULT_SYSTEM_PROMPT),
            MAX_MESSAGE_LEN,
        )
        .await?;
        self.bot.send_message(&message.chat, MSG_SET_SYS_HINT).await
    }

    /// Capture dialog: ask for free text, then wait for the next non-empty
    /// message from this user in this chat, up to the configured timeout.
    #[instrument(skip(self, message))]
    async fn set_custom_prompt(&self, message: &Message) -> Result<()> {
        self.bot.send_message(&message.chat, MSG_PROMPT_REQUEST).await?;

        let outcome = self
            .captures
            .wait(message.user.id, message.chat.id, self.capture_timeout)
            .await;

        match &outcome {
            CaptureOutcome::Captured(prompt) => {
                self.store.set_system_prompt(message.user.id, prompt.as_str()).await;
                info!(user_id = message.user.id, "step: custom system prompt captured");
                send_chunked(
                    self.bot.as_ref(),
                    &message.chat,
                    &prompt_set_message(prompt),
                    MAX_MESSAGE_LEN,
                )
                .await
            }
            CaptureOutcome::TimedOut | CaptureOutcome::Superseded => {
                warn!(
                    user_id = message.user.id,
                    outcome = ?outcome,
                    "step: custom system prompt not captured"
                );
                self.bot.send_message(&message.chat, MSG_NO_PROMPT_SET).await
            }
        }
    }

    async fn list_conversation(&self, message: &Message) -> Result<()> {
        let turns = self.store.history(message.user.id).await;
        if turns.is_empty() {
            return self.bot.send_message(&message.chat, MSG_NO_CONVERSATION).await;
        }
        for turn in &turns {
            let content = if turn.role == Role::System && turn.content.is_empty() {
                MSG_NO_SYSTEM_PROMPT
            } else {
                turn.content.as_str()
            };
            send_chunked(
                self.bot.as_ref(),
                &message.chat,
                &format!("{}: {}", turn.role.as_str(), content),
                MAX_MESSAGE_LEN,
            )
            .await?;
        }
        Ok(())
    }

    async fn dispatch(&self, command: Command, message: &Message) -> Result<()> {
        match command {
            Command::Help => self.bot.send_message(&message.chat, INSTRUCTIONS).await,
            Command::Example => {
                send_chunked(
                    self.bot.as_ref(),
                    &message.chat,
                    EXAMPLE_CONVERSATION,
                    MAX_MESSAGE_LEN,
                )
                .await
            }
            Command::ShowSystem => self.show_system_prompt(message).await,
            Command::SetDefaultSys => self.set_default_prompt(message).await,
            Command::SetCustomSys => self.set_custom_prompt(message).await,
            Command::ClearSys => {
                self.store.set_system_prompt(message.user.id, "").await;
                self.bot.send_message(&message.chat, MSG_SYS_CLEARED).await
            }
            Command::CurrConv => self.list_conversation(message).await,
            Command::ClearConv => {
                self.store.clear(message.user.id).await;
                self.bot.send_message(&message.chat, MSG_CONV_CLEARED).await
            }
            Command::Unknown(keyword) => {
                info!(user_id = message.user.id, keyword = %keyword, "step: unrecognized command");
                self.bot.send_message(&message.chat, MSG_INVALID_COMMAND).await
            }
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let command = match Command::parse(&message.content) {
            Some(c) => c,
            None => return Ok(HandlerResponse::Continue),
        };

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            command = ?command,
            "step: CommandHandler dispatch"
        );
        self.dispatch(command, message).await?;
        Ok(HandlerResponse::Stop)
    }
}
