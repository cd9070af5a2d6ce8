//! OpenAI-compatible [`LlmClient`]: async-openai chat completion with timeout, retries and key masking.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::LlmConfig;
use crate::message::{ChatMessage, MessageRole};
use crate::LlmClient;

/// System prompt added when the caller sends none.
pub const DEFAULT_SYSTEM_CONTENT: &str =
    "Ты опытный менеджер кейтеринговой компании Rest Delivery. Отвечай точно и по делу.";

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Masks an API key for logging: first 7 chars + "***" + last 4 chars; "***" for keys of 11 chars or less.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

fn to_openai_message(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}

#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Arc<Client<OpenAIConfig>>,
    masked_key: String,
    model: String,
    system_prompt: Option<String>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    retry_count: u32,
    retry_base_delay: Duration,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            masked_key,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            temperature: 0.3,
            max_tokens: 4000,
            timeout: Duration::from_secs(60),
            retry_count: 3,
            retry_base_delay: Duration::from_secs(1),
        }
    }

    /// Builds a client from any [`LlmConfig`].
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
            .with_temperature(config.temperature())
            .with_max_tokens(config.max_tokens())
            .with_timeout(Duration::from_secs(config.timeout_secs()))
            .with_retry_count(config.retry_count())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts per request; at least one.
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count.max(1);
        self
    }

    /// Delay before the second attempt; doubles on every further attempt.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn system_content(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_CONTENT)
    }

    #[allow(deprecated)]
    fn build_request(&self, messages: &[ChatMessage]) -> Result<CreateChatCompletionRequest> {
        let mut openai_messages = Vec::with_capacity(messages.len() + 1);
        if !messages.iter().any(|m| m.role == MessageRole::System) {
            openai_messages.push(to_openai_message(&ChatMessage::system(self.system_content()))?);
        }
        for msg in messages {
            openai_messages.push(to_openai_message(msg)?);
        }

        Ok(CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(openai_messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?)
    }

    async fn send_once(&self, request: CreateChatCompletionRequest) -> Result<String> {
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| anyhow!("LLM request timed out after {}s", self.timeout.as_secs()))??;

        if let Some(ref u) = response.usage {
            info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "LLM chat_completion usage"
            );
        }

        let choice = response
            .choices
            .first()
            .ok_or_else(|| anyhow!("No choices in LLM response"))?;
        Ok(choice.message.content.clone().unwrap_or_default())
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = self.build_request(&messages)?;

        info!(
            message_count = messages.len(),
            api_key = %self.masked_key,
            temperature = self.temperature,
            max_tokens = self.max_tokens,
            "LLM chat_completion request"
        );

        let mut last_error = None;
        for attempt in 0..self.retry_count {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.saturating_pow(attempt - 1);
                tokio::time::sleep(delay).await;
            }
            match self.send_once(request.clone()).await {
                Ok(text) => {
                    info!(attempt = attempt + 1, reply_len = text.len(), "LLM reply received");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.retry_count,
                        error = %e,
                        "LLM request failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let error = last_error.unwrap_or_else(|| anyhow!("no attempts made"));
        Err(error.context(format!(
            "LLM request failed after {} attempts",
            self.retry_count
        )))
    }
}
