//! Lyrics search module.
//!
//! * [`LyricsSearch`] — async trait implemented by lyrics backends.
//! * [`GeniusClient`] — Genius REST API backend.
//! * [`LyricsError`] — error variants.  The router renders every error the
//!   same way it renders an empty result.

pub mod client;
pub mod genius;

pub use client::{LyricsError, LyricsSearch, MAX_RESULTS, PREVIEW_PLACEHOLDER};
pub use genius::GeniusClient;
