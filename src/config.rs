//! Bot configuration loaded from environment variables.
//!
//! Two secrets are required at startup: the platform bot token and the
//! completion-service API key. Absence of either is fatal before the bot
//! connects anywhere.

use anyhow::Result;
use std::env;

/// Seconds the custom-prompt capture dialog waits for an answer.
pub const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 200;

/// Bot config. Use [`BotConfig::load`] for env-based loading and call
/// [`BotConfig::validate`] before init to fail fast.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN (required)
    pub bot_token: String,
    /// OPENAI_API_KEY (required)
    pub openai_api_key: String,
    /// OPENAI_MODEL, default `gpt-4`
    pub openai_model: String,
    /// OPENAI_BASE_URL, optional (e.g. a proxy)
    pub openai_base_url: Option<String>,
    /// LOG_FILE path
    pub log_file: String,
    /// CAPTURE_TIMEOUT_SECS, default 200
    pub capture_timeout_secs: u64,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;
        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let openai_base_url = env::var("OPENAI_BASE_URL").ok();
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/relay-bot.log".to_string());
        let capture_timeout_secs = env::var("CAPTURE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CAPTURE_TIMEOUT_SECS);

        Ok(Self {
            bot_token,
            openai_api_key,
            openai_model,
            openai_base_url,
            log_file,
            capture_timeout_secs,
        })
    }

    /// Validate config (e.g. OPENAI_BASE_URL must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.openai_base_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!("OPENAI_BASE_URL is set but not a valid URL: {}", url_str);
            }
        }
        if self.capture_timeout_secs == 0 {
            anyhow::bail!("CAPTURE_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }
}
