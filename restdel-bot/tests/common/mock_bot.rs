//! Mock implementation of [`restdel_bot::Bot`] for integration tests.
//!
//! Records every outgoing call so tests can assert on texts, keyboards and documents without hitting
//! Telegram. Message ids handed out by `send_message_and_return_id` count up from 100.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use restdel_bot::{Bot, Chat, Keyboard, RestdelError, Result, RichMessage};

/// One recorded outgoing call.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Sent {
        chat_id: i64,
        text: String,
    },
    Edited {
        chat_id: i64,
        message_id: String,
        text: String,
    },
    Deleted {
        chat_id: i64,
        message_id: String,
    },
    Rich {
        chat_id: i64,
        html: String,
        plain: String,
        buttons: Vec<String>,
    },
    Document {
        chat_id: i64,
        path: PathBuf,
        caption: String,
        buttons: Vec<String>,
    },
}

fn callback_data(keyboard: Option<&Keyboard>) -> Vec<String> {
    keyboard
        .map(|k| k.callback_data().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

#[derive(Default)]
pub struct MockBot {
    events: Mutex<Vec<BotEvent>>,
    next_id: AtomicI32,
    fail_edits: AtomicBool,
}

#[allow(dead_code)] // not every test binary uses every helper
impl MockBot {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(100),
            ..Default::default()
        }
    }

    /// Makes every `edit_message` fail, as Telegram does for messages that are too old.
    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    fn record(&self, event: BotEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<BotEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns and forgets the recorded events.
    pub fn take(&self) -> Vec<BotEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Texts of plain sends, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BotEvent::Sent { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edited_texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BotEvent::Edited { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn rich_messages(&self) -> Vec<BotEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, BotEvent::Rich { .. }))
            .collect()
    }

    pub fn documents(&self) -> Vec<BotEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, BotEvent::Document { .. }))
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(BotEvent::Sent {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        self.send_message(chat, text).await?;
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst).to_string())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(RestdelError::Bot("message can't be edited".to_string()));
        }
        self.record(BotEvent::Edited {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        self.record(BotEvent::Deleted {
            chat_id: chat.id,
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    async fn send_rich(&self, chat: &Chat, message: &RichMessage) -> Result<()> {
        self.record(BotEvent::Rich {
            chat_id: chat.id,
            html: message.html.clone(),
            plain: message.plain.clone(),
            buttons: callback_data(message.keyboard.as_ref()),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        chat: &Chat,
        path: &Path,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        self.record(BotEvent::Document {
            chat_id: chat.id,
            path: path.to_path_buf(),
            caption: caption.to_string(),
            buttons: callback_data(keyboard),
        });
        Ok(())
    }
}
