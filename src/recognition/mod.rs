//! Audio recognition module.
//!
//! * [`Recognizer`] — async trait implemented by recognition backends.
//! * [`AuddClient`] — AudD REST API backend.
//! * [`RecognitionError`] — error variants; callers only branch on
//!   match / no match.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use music_recognition_bot::config::AppConfig;
//! use music_recognition_bot::recognition::{AuddClient, Recognizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = AuddClient::from_config(&config.recognition, "api-token");
//!
//!     match client.recognize("https://example.com/clip.ogg").await {
//!         Ok(song) => println!("{} - {}", song.artist, song.title),
//!         Err(e) => println!("no match ({e})"),
//!     }
//! }
//! ```

pub mod audd;
pub mod client;

pub use audd::AuddClient;
pub use client::{RecognitionError, Recognizer};
