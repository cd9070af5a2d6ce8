//! Application settings beyond the base config: menu and quote files, sessions, cleanup, LLM,
//! business standards and the HTTP server.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use estimate::BusinessStandards;
use estimate_api::ServerConfig;
use llm_client::EnvLlmConfig;
use tracing::warn;

const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_CLEANUP_DAYS: i64 = 7;
const MAX_CLEANUP_DAYS: i64 = 365;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

/// Comma-separated user ids; empty means everyone is allowed.
fn parse_user_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("ALLOWED_USER_IDS: invalid user id '{}'", s))
        })
        .collect()
}

pub struct AppExtensions {
    /// MENU_DATA_PATH
    pub menu_data_path: String,
    /// QUOTES_DIR
    pub quotes_dir: String,
    /// SESSION_TTL_SECS
    pub session_ttl: Duration,
    /// CLEANUP_DAYS
    pub cleanup_days: i64,
    /// ENABLE_EXPERT_FALLBACKS
    pub enable_expert_fallbacks: bool,
    /// ALLOWED_USER_IDS
    pub allowed_user_ids: Vec<i64>,
    /// None when no API key is configured.
    pub llm: Option<EnvLlmConfig>,
    pub standards: BusinessStandards,
    pub server: ServerConfig,
}

impl AppExtensions {
    pub fn from_env() -> Result<Self> {
        let llm = match EnvLlmConfig::from_env() {
            Ok(llm) => Some(llm),
            Err(e) => {
                warn!(error = %e, "LLM is not configured");
                None
            }
        };
        let standards = BusinessStandards::from_env().context("Invalid business configuration")?;
        let allowed_user_ids = parse_user_ids(&env::var("ALLOWED_USER_IDS").unwrap_or_default())?;

        Ok(Self {
            menu_data_path: env::var("MENU_DATA_PATH").unwrap_or_else(|_| "data/menu.json".to_string()),
            quotes_dir: env::var("QUOTES_DIR").unwrap_or_else(|_| "data/quotes".to_string()),
            session_ttl: Duration::from_secs(
                env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS).max(1),
            ),
            cleanup_days: env_parse("CLEANUP_DAYS", DEFAULT_CLEANUP_DAYS).clamp(1, MAX_CLEANUP_DAYS),
            enable_expert_fallbacks: env_flag("ENABLE_EXPERT_FALLBACKS", true),
            allowed_user_ids,
            llm,
            standards,
            server: ServerConfig::from_env(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.is_none() && !self.enable_expert_fallbacks {
            anyhow::bail!(
                "OPENAI_API_KEY (or LLM_API_KEY) not set and ENABLE_EXPERT_FALLBACKS is off"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_parse_user_ids() {
        assert_eq!(parse_user_ids("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_user_ids(" 1, 42 ,").unwrap(), vec![1, 42]);
        assert!(parse_user_ids("1,abc").is_err());
    }
}
