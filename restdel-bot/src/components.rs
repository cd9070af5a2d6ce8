//! Component factory: builds the repository, menu, expert and handler chain from config. Isolates assembly
//! logic from the runners.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use estimate::MenuCatalog;
use experts::EstimateExpert;
use handler_chain::HandlerChain;
use llm_client::{ChatMessage, LlmClient, OpenAILlmClient};
use restdel_core::Bot;
use storage::EstimateRepository;
use tracing::{error, info, instrument, warn};

use crate::config::BotConfig;
use crate::handlers::{AuthHandler, EstimateHandler, LoggingHandler};
use crate::session::SessionStore;

/// Stand-in when no API key is configured: every call fails, so the experts use their fallbacks.
pub struct UnavailableLlm;

#[async_trait]
impl LlmClient for UnavailableLlm {
    async fn get_llm_response_with_messages(&self, _messages: Vec<ChatMessage>) -> Result<String> {
        Err(anyhow!("LLM is not configured"))
    }
}

/// Shared dependencies of the bot and the API server.
#[derive(Clone)]
pub struct BotComponents {
    pub repo: EstimateRepository,
    pub menu: Arc<MenuCatalog>,
    pub expert: Arc<EstimateExpert>,
    pub sessions: Arc<SessionStore>,
}

pub fn build_llm_client(config: &BotConfig) -> Arc<dyn LlmClient> {
    match &config.extensions.llm {
        Some(llm) => Arc::new(OpenAILlmClient::from_config(llm)),
        None => {
            warn!("No LLM API key, experts run on fallbacks only");
            Arc::new(UnavailableLlm)
        }
    }
}

#[instrument(skip(config))]
pub async fn open_repository(config: &BotConfig) -> Result<EstimateRepository> {
    EstimateRepository::new(config.database_url())
        .await
        .map_err(|e| {
            error!(
                error = %e,
                database_url = %config.database_url(),
                "Failed to initialize estimate storage"
            );
            anyhow!("Failed to initialize estimate storage: {}", e)
        })
}

pub fn load_menu(config: &BotConfig) -> Result<Arc<MenuCatalog>> {
    let path = &config.extensions.menu_data_path;
    let menu = MenuCatalog::load_or_create(path)
        .with_context(|| format!("Failed to load menu from {}", path))?;
    info!(path = %path, items = menu.len(), "Menu loaded");
    Ok(Arc::new(menu))
}

/// Expert over `llm` with the configured standards and fallback switch. Shared by the bot and the server.
pub fn build_expert(config: &BotConfig, llm: Arc<dyn LlmClient>, menu: Arc<MenuCatalog>) -> EstimateExpert {
    let ext = &config.extensions;
    EstimateExpert::new(llm, menu, ext.standards.clone()).with_fallbacks(ext.enable_expert_fallbacks)
}

/// Builds components with the given LLM client (tests pass a scripted one).
#[instrument(skip(config, llm))]
pub async fn build_components_with_llm(
    config: &BotConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<BotComponents> {
    let repo = open_repository(config).await?;
    let menu = load_menu(config)?;
    let expert = build_expert(config, llm, menu.clone());

    Ok(BotComponents {
        repo,
        menu,
        expert: Arc::new(expert),
        sessions: Arc::new(SessionStore::new(config.extensions.session_ttl)),
    })
}

pub async fn build_components(config: &BotConfig) -> Result<BotComponents> {
    build_components_with_llm(config, build_llm_client(config)).await
}

/// Logging → allowlist → estimate conversation.
pub fn build_handler_chain(
    config: &BotConfig,
    components: &BotComponents,
    bot: Arc<dyn Bot>,
) -> HandlerChain {
    let estimate = EstimateHandler::new(
        bot,
        components.expert.clone(),
        components.repo.clone(),
        components.sessions.clone(),
        config.extensions.quotes_dir.clone(),
    );
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AuthHandler::new(
            config.extensions.allowed_user_ids.clone(),
        )))
        .add_handler(Arc::new(estimate))
}
