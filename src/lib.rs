//! Music recognition Telegram bot.
//!
//! Identifies songs from audio, voice and video messages via AudD, searches
//! lyrics via Genius, and keeps per-user statistics and history in memory.

pub mod bot;
pub mod config;
pub mod lyrics;
pub mod recognition;
pub mod session;
pub mod song;
pub mod transport;
pub mod view;
