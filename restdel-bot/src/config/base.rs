//! Base config: Telegram Bot connection, logging, database. Loaded from env.

use anyhow::Result;
use std::env;

/// Base config: Telegram-related, logging, database only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN or TELEGRAM_BOT_TOKEN; empty when unset (only `run` needs it)
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// Default filter when RUST_LOG is unset
    pub log_level: String,
    /// Estimates database URL (`sqlite://path` or `sqlite::memory:`)
    pub database_url: String,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| non_empty("BOT_TOKEN"))
            .or_else(|| non_empty("TELEGRAM_BOT_TOKEN"))
            .unwrap_or_default();
        let database_url =
            non_empty("DATABASE_URL").unwrap_or_else(|| "sqlite://data/restdel.db".to_string());
        let log_file = non_empty("LOG_FILE").unwrap_or_else(|| "logs/restdel-bot.log".to_string());
        let log_level = non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let telegram_api_url = non_empty("TELEGRAM_API_URL").or_else(|| non_empty("TELOXIDE_API_URL"));

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            log_level,
            database_url,
        })
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), plus a token is required to poll Telegram.
    pub fn validate_for_bot(&self) -> Result<()> {
        self.validate()?;
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN (or TELEGRAM_BOT_TOKEN) not set; pass --token or set it in .env");
        }
        Ok(())
    }
}
