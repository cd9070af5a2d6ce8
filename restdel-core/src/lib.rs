//! # restdel-core
//!
//! Core types and traits for the Rest Delivery bot: [`Bot`], [`Handler`], message, user and keyboard
//! types, and tracing initialization. Transport-agnostic; the Telegram adapter lives in restdel-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot, Button, ButtonAction, Keyboard, RichMessage};
pub use error::{HandlerError, RestdelError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, Message, MessageDirection, ToCoreMessage, ToCoreUser, User,
    MESSAGE_TYPE_CALLBACK, MESSAGE_TYPE_TEXT,
};
