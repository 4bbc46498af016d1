//! # Chat-relay bot
//!
//! Relays chat messages to a completion service and back: per-user
//! conversation state, a leading-sigil command surface, a custom-prompt
//! capture dialog, and chunked delivery of oversized replies. The handler
//! chain (commands → captures → conversation turns) is the per-event
//! orchestrator; the Telegram transport and the completion service sit behind
//! the [`Bot`] and [`CompletionClient`] traits.

pub mod capture;
pub mod chain;
pub mod chunker;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod core;
pub mod handlers;
pub mod llm;
pub mod runner;
pub mod telegram;
pub mod texts;

pub use cli::{load_config, Cli, Commands};

pub use crate::core::{
    init_tracing, Bot, Chat, Handler, HandlerError, HandlerResponse, Message, RelayError, Result,
    ToCoreMessage, ToCoreUser, User,
};

pub use capture::{CaptureOutcome, PromptCaptureRegistry};
pub use chain::HandlerChain;
pub use chunker::{send_chunked, split_chunks, MAX_MESSAGE_LEN};
pub use commands::{Command, COMMAND_SIGIL};
pub use config::BotConfig;
pub use conversation::{ConversationStore, Role, Turn};
pub use handlers::{CaptureHandler, ChatHandler, CommandHandler};
pub use llm::{CompletionClient, CompletionError, OpenAiCompletionClient};
pub use runner::{build_handler_chain, run_bot};
pub use telegram::{run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};
