//! Shared fixtures: a recording bot, a scripted language model and a fully wired handler chain on an
//! in-memory database.

#![allow(dead_code)]

pub mod mock_bot;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use estimate::BusinessStandards;
use estimate_api::ServerConfig;
use handler_chain::HandlerChain;
use llm_client::{ChatMessage, LlmClient, MessageRole};
use restdel_bot::{
    build_components_with_llm, build_handler_chain, AppExtensions, BaseConfig, BotComponents,
    BotConfig, Chat, ConversationState, HandlerResponse, Message, MessageDirection, User,
};
use restdel_core::{MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT};
use tempfile::TempDir;

pub use mock_bot::{BotEvent, MockBot};

pub const CHAT_ID: i64 = 500;
pub const USER_ID: i64 = 42;

pub const MENU_JSON: &str = r#"{
    "canapes": [
        {"id": "1", "name": "Канапе с лососем", "weight": 25, "price": 150, "category": "канапе"},
        {"id": "2", "name": "Канапе с икрой", "weight": 18, "price": 250, "category": "канапе"}
    ],
    "salads": [
        {"id": "10", "name": "Салат Цезарь в тарталетке", "weight": 40, "price": 120, "category": "салаты"}
    ],
    "desserts": [
        {"id": "20", "name": "Макарон ассорти", "weight": 15, "price": 90, "category": "десерты"}
    ]
}"#;

/// Analysis reply with every detail known, budget included.
pub const FULL_ANALYSIS: &str = r#"{"event_type": "buffet", "guests_count": 30, "event_date": "2030-06-01",
    "duration_hours": 4, "need_service": false, "budget_limit": 50000, "missing_info": []}"#;

/// Analysis reply without a budget.
pub const NO_BUDGET_ANALYSIS: &str =
    r#"{"event_type": "buffet", "guests_count": 30, "need_service": false, "missing_info": []}"#;

pub const MODEL_PROPOSAL: &str = r#"{
    "proposal_text": "Легкий фуршет для 30 гостей",
    "menu_items": [
        {"category": "канапе", "items": [
            {"name": "Канапе с лососем", "weight": 25, "price_per_item": 150, "quantity": 90}
        ]},
        {"category": "салаты", "items": [
            {"name": "Салат Цезарь в тарталетке", "weight": 40, "price_per_item": 120, "quantity": 60}
        ]}
    ],
    "warnings": []
}"#;

/// Returns scripted replies in order and records every request. An exhausted script fails.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<anyhow::Result<String>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<anyhow::Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_user_message(&self) -> String {
        let requests = self.requests.lock().unwrap();
        requests
            .last()
            .and_then(|last| last.iter().rev().find(|m| m.role == MessageRole::User))
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.requests.lock().unwrap().push(messages);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply")))
    }
}

pub struct Options {
    pub fallbacks: bool,
    pub allowed_user_ids: Vec<i64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fallbacks: true,
            allowed_user_ids: Vec::new(),
        }
    }
}

/// Handler chain wired with a MockBot and a ScriptedLlm; files live in a temp dir.
pub struct Harness {
    pub bot: Arc<MockBot>,
    pub llm: Arc<ScriptedLlm>,
    pub chain: HandlerChain,
    pub components: BotComponents,
    pub quotes_dir: PathBuf,
    _dir: TempDir,
}

fn test_config(dir: &TempDir, options: &Options) -> BotConfig {
    let root = dir.path();
    std::fs::write(root.join("menu.json"), MENU_JSON).unwrap();
    BotConfig {
        base: BaseConfig {
            bot_token: "123456:TEST".to_string(),
            telegram_api_url: None,
            log_file: root.join("bot.log").display().to_string(),
            log_level: "info".to_string(),
            database_url: "sqlite::memory:".to_string(),
        },
        extensions: AppExtensions {
            menu_data_path: root.join("menu.json").display().to_string(),
            quotes_dir: root.join("quotes").display().to_string(),
            session_ttl: Duration::from_secs(3600),
            cleanup_days: 7,
            enable_expert_fallbacks: options.fallbacks,
            allowed_user_ids: options.allowed_user_ids.clone(),
            llm: None,
            standards: BusinessStandards::default(),
            server: ServerConfig::default(),
        },
    }
}

impl Harness {
    pub async fn new(llm: Arc<ScriptedLlm>) -> Self {
        Self::with_options(llm, Options::default()).await
    }

    pub async fn with_options(llm: Arc<ScriptedLlm>, options: Options) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir, &options);
        let components = build_components_with_llm(&config, llm.clone()).await.unwrap();
        let bot = Arc::new(MockBot::new());
        let chain = build_handler_chain(&config, &components, bot.clone());
        Self {
            bot,
            llm,
            chain,
            components,
            quotes_dir: PathBuf::from(&config.extensions.quotes_dir),
            _dir: dir,
        }
    }

    pub async fn text_from(&self, user_id: i64, content: &str) -> restdel_bot::Result<HandlerResponse> {
        self.chain.handle(&message(user_id, "1", content, MESSAGE_TYPE_TEXT)).await
    }

    pub async fn text(&self, content: &str) -> HandlerResponse {
        self.text_from(USER_ID, content).await.unwrap()
    }

    /// Press of an inline button on the bot message `message_id`.
    pub async fn press(&self, message_id: &str, data: &str) -> HandlerResponse {
        self.chain
            .handle(&message(USER_ID, message_id, data, MESSAGE_TYPE_CALLBACK))
            .await
            .unwrap()
    }

    pub async fn state(&self) -> ConversationState {
        self.components.sessions.lock(CHAT_ID).await.state
    }
}

pub fn message(user_id: i64, id: &str, content: &str, message_type: &str) -> Message {
    Message {
        id: id.to_string(),
        user: User {
            id: user_id,
            username: Some("client".to_string()),
            first_name: Some("Анна".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: CHAT_ID,
            chat_type: "Private".to_string(),
        },
        content: content.to_string(),
        message_type: message_type.to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
    }
}
