//! Chat transport seam.
//!
//! [`ChatTransport`] is everything the router needs from the chat platform:
//! send, edit in place, resolve a media download URL and acknowledge a button
//! press.  [`TelegramTransport`] implements it over a teloxide `Bot`; tests
//! use an in-memory fake.

pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;

pub use teloxide::types::{ChatId, MessageId};
pub use telegram::TelegramTransport;

use crate::view::Reply;

/// Errors raised by the chat platform.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The Bot API call failed (network, API error, bad response).
    #[error("chat API request failed: {0}")]
    Request(String),

    /// The platform did not return a downloadable path for a file.
    #[error("file {0} cannot be downloaded")]
    FileUnavailable(String),
}

impl From<teloxide::RequestError> for TransportError {
    fn from(e: teloxide::RequestError) -> Self {
        TransportError::Request(e.to_string())
    }
}

/// Async trait over the chat platform's outbound operations.
///
/// Implementors must be `Send + Sync` so they can be shared by concurrent
/// update handlers (e.g. wrapped in `Arc<dyn ChatTransport>`).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `reply` to `chat`, optionally as a reply to `reply_to`.
    /// Returns the id of the new message so it can be edited later.
    async fn send(
        &self,
        chat: ChatId,
        reply_to: Option<MessageId>,
        reply: &Reply,
    ) -> Result<MessageId, TransportError>;

    /// Replace the text and buttons of an existing message.
    async fn edit(&self, chat: ChatId, message: MessageId, reply: &Reply)
        -> Result<(), TransportError>;

    /// Temporary, publicly fetchable URL of an attached file.
    async fn media_url(&self, file_id: &str) -> Result<String, TransportError>;

    /// Acknowledge a button press, optionally showing `notice` to the user.
    async fn acknowledge(&self, callback_id: &str, notice: Option<&str>)
        -> Result<(), TransportError>;
}
