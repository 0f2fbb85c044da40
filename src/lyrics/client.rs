//! Core `LyricsSearch` trait and its error type.

use async_trait::async_trait;
use thiserror::Error;

use crate::song::LyricsHit;

/// Text returned by [`LyricsSearch::preview`].  Lyrics pages are linked, not
/// scraped.
pub const PREVIEW_PLACEHOLDER: &str =
    "Lyrics preview unavailable. Click the link to view full lyrics.";

/// Most hits a search ever returns.
pub const MAX_RESULTS: usize = 5;

/// Errors that can occur during a lyrics search.
#[derive(Debug, Error)]
pub enum LyricsError {
    /// The query was empty after trimming; no request was sent.
    #[error("lyrics query is empty")]
    EmptyQuery,

    /// HTTP transport, connection or non-2xx status.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("lyrics request timed out")]
    Timeout,

    /// The response body was not the expected JSON.
    #[error("failed to parse lyrics response: {0}")]
    Parse(String),

    /// The JSON had no `response` object.
    #[error("lyrics response has no `response` object")]
    MissingResponse,
}

impl From<reqwest::Error> for LyricsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LyricsError::Timeout
        } else if e.is_decode() {
            LyricsError::Parse(e.to_string())
        } else {
            LyricsError::Request(e.to_string())
        }
    }
}

/// Async trait for free-text lyrics search.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks.
#[async_trait]
pub trait LyricsSearch: Send + Sync {
    /// Ranked candidates for `query`, best first, in the remote service's
    /// order.  An empty vector means the service found nothing.
    async fn search(&self, query: &str) -> Result<Vec<LyricsHit>, LyricsError>;

    /// A short preview of the lyrics at `url`.
    ///
    /// Always the static [`PREVIEW_PLACEHOLDER`]; the page is never fetched.
    fn preview(&self, _url: &str) -> &'static str {
        PREVIEW_PLACEHOLDER
    }
}
