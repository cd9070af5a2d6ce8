//! # restdel-bot
//!
//! Rest Delivery estimate bot. Wires the estimate domain, the language-model experts and storage into a
//! Telegram conversation and an HTTP API.
//!
//! ## Modules
//!
//! - [`config`] – BaseConfig, AppExtensions, BotConfig (env loading)
//! - [`session`] – per-chat conversation state with TTL
//! - [`handlers`] – logging, allowlist and the estimate conversation
//! - [`telegram`] – teloxide adapters and dispatcher
//! - [`components`] – component factory
//! - [`runner`] – `run_bot` and `run_server`

pub mod cleanup;
pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;
pub mod session;
pub mod telegram;

pub use cli::{Cli, Commands};
pub use components::{
    build_components, build_components_with_llm, build_expert, build_handler_chain, BotComponents,
    UnavailableLlm,
};
pub use config::{AppExtensions, BaseConfig, BotConfig};
pub use handlers::{AuthHandler, EstimateHandler, LoggingHandler};
pub use runner::{run_bot, run_server};
pub use session::{ConversationState, Session, SessionStore};

pub use restdel_core::{
    Bot, Button, ButtonAction, Chat, Handler, HandlerError, HandlerResponse, Keyboard, Message,
    MessageDirection, RestdelError, Result, RichMessage, User,
};
