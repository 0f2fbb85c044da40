//! Core `Recognizer` trait and its error type.

use async_trait::async_trait;
use thiserror::Error;

use crate::song::SongMatch;

/// Errors that can occur during recognition.
///
/// Every variant renders the same way to the user; the distinction only
/// reaches the log.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// HTTP transport, connection or non-2xx status.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("recognition request timed out")]
    Timeout,

    /// The response body was not the expected JSON.
    #[error("failed to parse recognition response: {0}")]
    Parse(String),

    /// The service reported a status other than `success` (or none at all).
    #[error("recognition service returned status {0:?}")]
    Status(Option<String>),

    /// The service succeeded but found no song.
    #[error("no song matched the submitted media")]
    NoMatch,
}

impl RecognitionError {
    /// `true` when the service answered normally but found nothing.
    pub fn is_no_match(&self) -> bool {
        matches!(self, RecognitionError::NoMatch)
    }
}

impl From<reqwest::Error> for RecognitionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecognitionError::Timeout
        } else if e.is_decode() {
            RecognitionError::Parse(e.to_string())
        } else {
            RecognitionError::Request(e.to_string())
        }
    }
}

/// Async trait for song recognition from a publicly fetchable media URL.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Recognizer>`).
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, media_url: &str) -> Result<SongMatch, RecognitionError>;
}
