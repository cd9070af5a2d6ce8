//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI-compatible implementation with timeout and retries.
//! [`extract_json`] pulls the JSON object out of a model reply.

use anyhow::Result;
use async_trait::async_trait;

mod config;
mod json;
mod message;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use json::{extract_json, extract_json_as};
pub use message::{ChatMessage, MessageRole};
pub use openai_llm::{mask_token, OpenAILlmClient, DEFAULT_SYSTEM_CONTENT};

/// LLM client interface: request a completion from a list of messages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply text for the given messages (system/user/assistant).
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String>;
}
