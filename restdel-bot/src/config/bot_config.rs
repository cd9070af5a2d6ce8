//! BotConfig: BaseConfig + AppExtensions. Use load() for env-based loading.

use anyhow::Result;
use llm_client::{mask_token, LlmConfig};

use super::{AppExtensions, BaseConfig};

/// Bot config: BaseConfig + extensions. Use BotConfig::load() for env-based loading.
pub struct BotConfig {
    pub base: BaseConfig,
    pub extensions: AppExtensions,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let extensions = AppExtensions::from_env()?;
        Ok(Self { base, extensions })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.extensions.validate()
    }

    /// Validation for `run`: also requires the bot token.
    pub fn validate_for_bot(&self) -> Result<()> {
        self.base.validate_for_bot()?;
        self.extensions.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn extensions(&self) -> &AppExtensions {
        &self.extensions
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn log_level(&self) -> &str {
        &self.base.log_level
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }

    /// Effective settings as `key = value` lines; secrets are masked.
    pub fn describe(&self) -> String {
        let ext = &self.extensions;
        let token = if self.base.bot_token.is_empty() {
            "(not set)".to_string()
        } else {
            mask_token(&self.base.bot_token)
        };
        let mut lines = vec![
            format!("BOT_TOKEN = {}", token),
            format!(
                "TELEGRAM_API_URL = {}",
                self.telegram_api_url().unwrap_or("(default)")
            ),
            format!("LOG_FILE = {}", self.base.log_file),
            format!("LOG_LEVEL = {}", self.base.log_level),
            format!("DATABASE_URL = {}", self.base.database_url),
            format!("MENU_DATA_PATH = {}", ext.menu_data_path),
            format!("QUOTES_DIR = {}", ext.quotes_dir),
            format!("SESSION_TTL_SECS = {}", ext.session_ttl.as_secs()),
            format!("CLEANUP_DAYS = {}", ext.cleanup_days),
            format!("ENABLE_EXPERT_FALLBACKS = {}", ext.enable_expert_fallbacks),
            format!("ALLOWED_USER_IDS = {:?}", ext.allowed_user_ids),
        ];
        match &ext.llm {
            Some(llm) => {
                lines.push(format!("OPENAI_API_KEY = {}", mask_token(llm.api_key())));
                lines.push(format!("OPENAI_BASE_URL = {}", llm.base_url()));
                lines.push(format!("MODEL = {}", llm.model()));
                lines.push(format!("EXPERT_RETRY_COUNT = {}", llm.retry_count()));
            }
            None => lines.push("OPENAI_API_KEY = (not set)".to_string()),
        }
        let s = &ext.standards;
        lines.push(format!("MIN_ORDER_AMOUNT = {}", s.min_order_amount));
        lines.push(format!(
            "GRAMMAGE_PER_GUEST = {}-{}",
            s.min_grammage_per_guest, s.max_grammage_per_guest
        ));
        lines.push(format!(
            "WAITER_COST = {} + {}/h",
            s.waiter_cost_base, s.waiter_cost_hourly
        ));
        lines.push(format!(
            "DELIVERY_COST = {} / {}",
            s.delivery_cost_mkad, s.delivery_cost_outside
        ));
        lines.push(format!("APP_ADDRESS = {}", ext.server.bind_address()));
        lines.push(format!("DEBUG = {}", ext.server.debug));
        lines.push(format!("ENVIRONMENT = {}", ext.server.environment));
        lines.join("\n")
    }
}
