//! Inbound events and their classification into routes.
//!
//! The dispatcher converts every Telegram update into an [`Inbound`] event;
//! [`classify`] then picks exactly one [`Route`].  Explicit commands, media
//! and button presses are checked first; [`Route::UnrecognizedText`] is the
//! catch-all.

use std::fmt;

use crate::session::UserId;
use crate::transport::{ChatId, MessageId};

/// Who sent the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub first_name: String,
}

/// Kind of attached media accepted for recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Voice,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::Video => "video",
        })
    }
}

/// Content of an inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Media { kind: MediaKind, file_id: String },
    /// Anything else (stickers, photos, locations, ...).
    Other,
}

/// What arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Message {
        message_id: MessageId,
        content: Content,
    },
    ButtonPress {
        callback_id: String,
        /// Opaque callback data; `None` when the platform sent none.
        tag: Option<String>,
    },
}

/// One inbound update, stripped down to what the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub sender: Sender,
    pub chat: ChatId,
    pub payload: Payload,
}

impl Inbound {
    /// Id of the triggering message, if the event is a message.
    pub fn message_id(&self) -> Option<MessageId> {
        match &self.payload {
            Payload::Message { message_id, .. } => Some(*message_id),
            Payload::ButtonPress { .. } => None,
        }
    }
}

/// The handler an event is dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Start,
    Help,
    About,
    Stats,
    History,
    LyricsQuery(&'a str),
    LyricsEmptyQuery,
    MediaSubmission { kind: MediaKind, file_id: &'a str },
    ButtonPress {
        callback_id: &'a str,
        tag: Option<&'a str>,
    },
    UnrecognizedText,
}

/// Split `text` into a command name and its argument text.
///
/// The command is the first whitespace-delimited token without its leading
/// `/` and any `@BotName` suffix, lowercased.  Returns `None` for text that
/// is not a command.
pub fn parse_command(text: &str) -> Option<(String, &str)> {
    let text = text.trim_start();
    let rest = text.strip_prefix('/')?;
    let (token, args) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    let name = token.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some((name.to_ascii_lowercase(), args))
}

/// Pick the route for `event`.
pub fn classify(event: &Inbound) -> Route<'_> {
    match &event.payload {
        Payload::ButtonPress { callback_id, tag } => Route::ButtonPress {
            callback_id,
            tag: tag.as_deref(),
        },
        Payload::Message { content, .. } => match content {
            Content::Media { kind, file_id } => Route::MediaSubmission {
                kind: *kind,
                file_id,
            },
            Content::Text(text) => classify_text(text),
            Content::Other => Route::UnrecognizedText,
        },
    }
}

fn classify_text(text: &str) -> Route<'_> {
    let Some((command, args)) = parse_command(text) else {
        return Route::UnrecognizedText;
    };
    match command.as_str() {
        "start" => Route::Start,
        "help" => Route::Help,
        "about" => Route::About,
        "stats" => Route::Stats,
        "history" => Route::History,
        "lyrics" if args.is_empty() => Route::LyricsEmptyQuery,
        "lyrics" => Route::LyricsQuery(args),
        _ => Route::UnrecognizedText,
    }
}
