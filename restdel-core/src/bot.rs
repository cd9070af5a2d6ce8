//! Bot abstraction for sending, editing and deleting messages.
//!
//! [`Bot`] is transport-agnostic; the teloxide implementation lives in restdel-bot. Inline keyboards are
//! described with [`Keyboard`] so handlers never touch transport types.

use std::path::Path;

use crate::error::{RestdelError, Result};
use crate::types::Chat;
use async_trait::async_trait;

/// What happens when an inline button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Sends the data back to the bot as a callback message.
    Callback(String),
    /// Opens the URL in the client.
    Url(String),
}

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Inline keyboard: rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row with a single button.
    pub fn button(mut self, button: Button) -> Self {
        self.rows.push(vec![button]);
        self
    }

    /// Returns callback data of all buttons in order.
    pub fn callback_data(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .filter_map(|b| match &b.action {
                ButtonAction::Callback(data) => Some(data.as_str()),
                ButtonAction::Url(_) => None,
            })
            .collect()
    }
}

/// A formatted message: HTML body, plain-text fallback for when the transport rejects the markup, optional keyboard.
#[derive(Debug, Clone, Default)]
pub struct RichMessage {
    pub html: String,
    pub plain: String,
    pub keyboard: Option<Keyboard>,
}

/// Abstraction for sending and editing messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a message and returns its id (for later `edit_message` / `delete_message`).
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Edits an already-sent message. `message_id` is transport-specific (e.g. Telegram numeric string).
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;
    /// Deletes an already-sent message.
    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()>;
    /// Sends formatted text with an optional inline keyboard. Falls back to `plain` when markup is rejected.
    async fn send_rich(&self, chat: &Chat, message: &RichMessage) -> Result<()>;
    /// Uploads a local file as a document with a caption and optional keyboard.
    async fn send_document(
        &self,
        chat: &Chat,
        path: &Path,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()>;
}

/// Parses a message id string into an i32. Used by edit/delete.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| RestdelError::Bot(format!("Invalid message_id: {}", s)))
}
