//! Wraps teloxide::Bot and implements [`restdel_core::Bot`]. Production code talks to Telegram; tests
//! substitute another Bot impl.

use std::path::Path;

use async_trait::async_trait;
use restdel_core::{
    parse_message_id, Bot as CoreBot, ButtonAction, Chat, Keyboard, RestdelError, Result,
    RichMessage,
};
use teloxide::payloads::{SendDocumentSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode};
use tracing::warn;

fn bot_error(e: impl std::fmt::Display) -> RestdelError {
    RestdelError::Bot(e.to_string())
}

/// Converts a core keyboard into Telegram inline markup, one row per core row.
pub fn to_inline_markup(keyboard: &Keyboard) -> Result<InlineKeyboardMarkup> {
    let mut rows = Vec::with_capacity(keyboard.rows.len());
    for row in &keyboard.rows {
        let mut buttons = Vec::with_capacity(row.len());
        for button in row {
            let converted = match &button.action {
                ButtonAction::Callback(data) => {
                    InlineKeyboardButton::callback(button.text.clone(), data.clone())
                }
                ButtonAction::Url(url) => {
                    let url = reqwest::Url::parse(url).map_err(bot_error)?;
                    InlineKeyboardButton::url(button.text.clone(), url)
                }
            };
            buttons.push(converted);
        }
        rows.push(buttons);
    }
    Ok(InlineKeyboardMarkup::new(rows))
}

/// Thin wrapper around teloxide::Bot that implements restdel-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(sent.id.to_string())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .delete_message(ChatId(chat.id), MessageId(id))
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_rich(&self, chat: &Chat, message: &RichMessage) -> Result<()> {
        let markup = message.keyboard.as_ref().map(to_inline_markup).transpose()?;

        let mut html = self
            .bot
            .send_message(ChatId(chat.id), message.html.clone())
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup.clone() {
            html = html.reply_markup(markup);
        }
        let Err(e) = html.await else {
            return Ok(());
        };
        warn!(error = %e, chat_id = chat.id, "HTML message rejected, sending plain text");

        let mut plain = self.bot.send_message(ChatId(chat.id), message.plain.clone());
        if let Some(markup) = markup {
            plain = plain.reply_markup(markup);
        }
        plain.await.map_err(bot_error)?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat: &Chat,
        path: &Path,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let mut request = self
            .bot
            .send_document(ChatId(chat.id), InputFile::file(path.to_path_buf()))
            .caption(caption.to_string());
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_inline_markup(keyboard)?);
        }
        request.await.map_err(bot_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restdel_core::Button;

    /// **Test: Core keyboard rows become inline rows; an invalid URL button is an error.**
    #[test]
    fn test_to_inline_markup() {
        let keyboard = Keyboard::new()
            .button(Button::callback("Принять", "accept_proposal"))
            .button(Button::url("Сайт", "https://example.com"));

        let markup = to_inline_markup(&keyboard).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "Принять");

        let broken = Keyboard::new().button(Button::url("Сайт", "not a url"));
        assert!(to_inline_markup(&broken).is_err());
    }
}
