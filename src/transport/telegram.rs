//! [`ChatTransport`] over the Telegram Bot API (teloxide).

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode, ReplyParameters,
};

use crate::view::{ButtonTarget, Keyboard, Reply, TextFormat};

use super::{ChatTransport, TransportError};

/// Convert a [`Keyboard`] into Telegram's inline markup.
///
/// Buttons whose URL does not parse are dropped with a warning, and rows
/// left empty are removed; Telegram rejects the whole message otherwise.
pub fn inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    let rows = keyboard.rows().iter().map(|row| {
        row.iter()
            .filter_map(|button| match &button.target {
                ButtonTarget::Action(action) => Some(InlineKeyboardButton::callback(
                    button.label.clone(),
                    action.tag(),
                )),
                ButtonTarget::Url(url) => match reqwest::Url::parse(url) {
                    Ok(parsed) => Some(InlineKeyboardButton::url(button.label.clone(), parsed)),
                    Err(e) => {
                        log::warn!("dropping button {:?}: invalid URL {url:?} ({e})", button.label);
                        None
                    }
                },
            })
            .collect::<Vec<_>>()
    });
    InlineKeyboardMarkup::new(rows.filter(|row| !row.is_empty()))
}

/// Talks to Telegram through a teloxide [`Bot`].
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    token: String,
    api_base: String,
}

impl TelegramTransport {
    /// `token` is needed again here because file download URLs embed it.
    pub fn new(bot: Bot, token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            bot,
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    /// Public download URL for a `getFile` path.
    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            file_path
        )
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(
        &self,
        chat: ChatId,
        reply_to: Option<MessageId>,
        reply: &Reply,
    ) -> Result<MessageId, TransportError> {
        let mut request = self.bot.send_message(chat, reply.text.clone());
        if reply.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(original) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(original));
        }
        if !reply.keyboard.is_empty() {
            request = request.reply_markup(inline_markup(&reply.keyboard));
        }

        let sent = request.await?;
        Ok(sent.id)
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        reply: &Reply,
    ) -> Result<(), TransportError> {
        let mut request = self
            .bot
            .edit_message_text(chat, message, reply.text.clone());
        if reply.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if !reply.keyboard.is_empty() {
            request = request.reply_markup(inline_markup(&reply.keyboard));
        }

        request.await?;
        Ok(())
    }

    async fn media_url(&self, file_id: &str) -> Result<String, TransportError> {
        let file = self.bot.get_file(file_id).await?;
        if file.path.is_empty() {
            return Err(TransportError::FileUnavailable(file_id.to_string()));
        }
        Ok(self.file_url(&file.path))
    }

    async fn acknowledge(
        &self,
        callback_id: &str,
        notice: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.answer_callback_query(callback_id);
        if let Some(text) = notice {
            request = request.text(text);
        }
        request.await?;
        Ok(())
    }
}
