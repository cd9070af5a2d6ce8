//! Entry points: `run_bot` drives the Telegram conversation, `run_server` the HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use estimate_api::{spawn_periodic_cleanup, AppState, CLEANUP_INTERVAL};
use restdel_core::{init_tracing, Bot};
use tracing::{info, instrument};

use crate::cleanup::spawn_session_purge;
use crate::components::{
    build_components, build_expert, build_handler_chain, build_llm_client, load_menu, open_repository,
};
use crate::config::BotConfig;
use crate::telegram::{run_dispatcher, TelegramBotAdapter};

fn build_teloxide_bot(config: &BotConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.bot_token());
    match config.telegram_api_url() {
        Some(url) => {
            let url = reqwest::Url::parse(url).context("Invalid TELEGRAM_API_URL")?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Main entry: validate config, init logging, build components and handler chain, then dispatch updates.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate_for_bot()?;
    init_tracing(config.log_file(), config.log_level())?;

    info!(
        database_url = %config.database_url(),
        menu = %config.extensions.menu_data_path,
        llm = config.extensions.llm.is_some(),
        "Initializing bot"
    );

    let components = build_components(&config).await?;
    let teloxide_bot = build_teloxide_bot(&config)?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let handler_chain = build_handler_chain(&config, &components, bot);

    let ext = &config.extensions;
    let cleanup = spawn_periodic_cleanup(
        components.repo.clone(),
        PathBuf::from(&ext.quotes_dir),
        ext.cleanup_days,
        CLEANUP_INTERVAL,
    );
    let purge = spawn_session_purge(components.sessions.clone(), CLEANUP_INTERVAL);

    info!("Bot started successfully");
    let result = run_dispatcher(teloxide_bot, handler_chain).await;

    cleanup.abort();
    purge.abort();
    result
}

/// Serves the HTTP API with its own periodic cleanup. `host` / `port` override APP_HOST / APP_PORT.
#[instrument(skip(config))]
pub async fn run_server(config: BotConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    config.base.validate()?;
    init_tracing(config.log_file(), config.log_level())?;

    let ext = &config.extensions;
    let repo = open_repository(&config).await?;
    let menu = load_menu(&config)?;
    let expert = build_expert(&config, build_llm_client(&config), menu.clone());
    let state = AppState::new(
        menu,
        ext.standards.clone(),
        repo.clone(),
        ext.quotes_dir.clone(),
        ext.server.clone().with_bind(host, port),
    )
    .with_expert(Arc::new(expert));

    let cleanup = spawn_periodic_cleanup(
        repo,
        PathBuf::from(&ext.quotes_dir),
        ext.cleanup_days,
        CLEANUP_INTERVAL,
    );
    let result = estimate_api::serve(state).await;
    cleanup.abort();
    result
}

