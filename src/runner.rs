//! Bot assembly and entry point: builds the components and the handler chain,
//! then runs the repl.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, instrument};

use crate::capture::PromptCaptureRegistry;
use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::conversation::ConversationStore;
use crate::core::{init_tracing, Bot};
use crate::handlers::{CaptureHandler, ChatHandler, CommandHandler};
use crate::llm::{CompletionClient, OpenAiCompletionClient};
use crate::telegram::{run_repl, TelegramBotAdapter};

/// Builds the handler chain: commands → pending captures → conversation turns.
/// This ordering is the orchestration contract: a command is never captured or
/// recorded as a turn, and a captured message is never recorded as a turn.
pub fn build_handler_chain(
    bot: Arc<dyn Bot>,
    store: ConversationStore,
    captures: PromptCaptureRegistry,
    completions: Arc<dyn CompletionClient>,
    capture_timeout: Duration,
) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(CommandHandler::new(
            bot.clone(),
            store.clone(),
            captures.clone(),
            capture_timeout,
        )))
        .add_handler(Arc::new(CaptureHandler::new(captures)))
        .add_handler(Arc::new(ChatHandler::new(bot, store, completions)))
}

/// Main entry: init logging, validate config, build components, run the repl.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    std::fs::create_dir_all("logs")?;
    init_tracing(config.log_file.as_str())?;

    info!(model = %config.openai_model, "Initializing bot");

    let teloxide_bot = teloxide::Bot::new(config.bot_token.clone());
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let completions: Arc<dyn CompletionClient> = match config.openai_base_url.clone() {
        Some(base_url) => Arc::new(OpenAiCompletionClient::with_base_url(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            base_url,
        )),
        None => Arc::new(OpenAiCompletionClient::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )),
    };

    let store = ConversationStore::new();
    let captures = PromptCaptureRegistry::new();
    let chain = build_handler_chain(
        bot,
        store,
        captures,
        completions,
        Duration::from_secs(config.capture_timeout_secs),
    );

    info!("Bot started successfully");

    run_repl(teloxide_bot, chain).await?;

    Ok(())
}
