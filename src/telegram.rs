//! Telegram transport: teloxide-backed [`Bot`] adapter, message conversion,
//! and the repl that feeds the handler chain.

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatAction, ChatId},
};
use tracing::{error, info, instrument};

use crate::chain::HandlerChain;
use crate::core::{Bot as CoreBot, Chat, Message, RelayError, Result, ToCoreMessage, ToCoreUser, User};

/// Thin wrapper around teloxide::Bot that implements the core Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| RelayError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn indicate_typing(&self, chat: &Chat) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
            .map_err(|e| RelayError::Bot(e.to_string()))?;
        Ok(())
    }
}

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: format!("{:?}", self.0.chat.kind),
            },
            content: self.0.text().unwrap_or("").to_string(),
            from_bot: self.0.from.as_ref().map(|u| u.is_bot).unwrap_or(false),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Starts the repl with the given teloxide Bot and HandlerChain. Each message
/// is converted to a core Message and passed to chain.handle in a spawned task
/// so a slow handler (completion call, capture wait) never blocks delivery of
/// other events. Bot-authored events are dropped to prevent feedback loops.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> anyhow::Result<()> {
    let chain = handler_chain;
    teloxide::repl(
        bot,
        move |_bot: teloxide::Bot, msg: teloxide::types::Message| {
            let chain = chain.clone();

            async move {
                let wrapper = TelegramMessageWrapper(&msg);
                let core_msg = wrapper.to_core();

                if core_msg.from_bot {
                    info!(
                        chat_id = core_msg.chat.id,
                        "step: ignoring bot-authored message"
                    );
                    return Ok(());
                }

                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    message_content = %core_msg.content,
                    "Received message"
                );

                tokio::spawn(async move {
                    if let Err(e) = chain.handle(&core_msg).await {
                        error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                    }
                });

                Ok(())
            }
        },
    )
    .await;

    Ok(())
}
