//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
    fn max_tokens(&self) -> u32;
    fn timeout_secs(&self) -> u64;
    /// Total attempts per request.
    fn retry_count(&self) -> u32;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
    pub llm_retry_count: u32,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn temperature(&self) -> f32 {
        self.llm_temperature
    }
    fn max_tokens(&self) -> u32 {
        self.llm_max_tokens
    }
    fn timeout_secs(&self) -> u64 {
        self.llm_timeout_secs
    }
    fn retry_count(&self) -> u32 {
        self.llm_retry_count
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl EnvLlmConfig {
    /// Load from environment variables. OPENAI_API_KEY (or LLM_API_KEY) is required.
    pub fn from_env() -> Result<Self> {
        let non_empty = |key: &str| env::var(key).ok().filter(|s| !s.trim().is_empty());
        let openai_api_key = non_empty("OPENAI_API_KEY")
            .or_else(|| non_empty("LLM_API_KEY"))
            .context("OPENAI_API_KEY (or LLM_API_KEY) not set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        let llm_model = env::var("MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_temperature: env_parse("LLM_TEMPERATURE", 0.3),
            llm_max_tokens: env_parse("LLM_MAX_TOKENS", 4000),
            llm_timeout_secs: env_parse("LLM_TIMEOUT_SECS", 60),
            llm_retry_count: env_parse("EXPERT_RETRY_COUNT", 3u32).max(1),
        })
    }
}
