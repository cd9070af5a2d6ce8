//! Adapters from Telegram (teloxide) types to restdel_core types.

use restdel_core::{
    Chat, Message, MessageDirection, ToCoreMessage, ToCoreUser, User, MESSAGE_TYPE_CALLBACK,
    MESSAGE_TYPE_TEXT,
};
use teloxide::types::CallbackQuery;

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn unknown_user() -> User {
    User {
        id: 0,
        username: None,
        first_name: None,
        last_name: None,
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(unknown_user),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: format!("{:?}", self.0.chat.kind),
            },
            content: self.0.text().unwrap_or("").to_string(),
            message_type: MESSAGE_TYPE_TEXT.to_string(),
            direction: MessageDirection::Incoming,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Wraps a button press. The core message id is the id of the message carrying the keyboard, so
/// handlers can edit it; the content is the callback data.
pub struct TelegramCallbackWrapper<'a>(pub &'a CallbackQuery);

impl<'a> ToCoreMessage for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> Message {
        let user = TelegramUserWrapper(&self.0.from).to_core();
        let (id, chat) = match self.0.message.as_ref() {
            Some(message) => (
                message.id().to_string(),
                Chat {
                    id: message.chat().id.0,
                    chat_type: format!("{:?}", message.chat().kind),
                },
            ),
            // Inline-mode presses have no message; answer in the user's private chat.
            None => (
                String::new(),
                Chat {
                    id: user.id,
                    chat_type: "Private".to_string(),
                },
            ),
        };

        Message {
            id,
            user,
            chat,
            content: self.0.data.clone().unwrap_or_default(),
            message_type: MESSAGE_TYPE_CALLBACK.to_string(),
            direction: MessageDirection::Incoming,
            created_at: chrono::Utc::now(),
        }
    }
}
