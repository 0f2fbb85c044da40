//! Configuration module for the music recognition bot.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for the platform config directory, TOML loading via
//! `AppConfig::load`, and [`Secrets`] read from the process environment.

pub mod paths;
pub mod secrets;
pub mod settings;

pub use paths::AppPaths;
pub use secrets::{ConfigError, Secrets};
pub use settings::{
    AppConfig, LyricsConfig, RecognitionConfig, StatsConfig, TelegramConfig, UiConfig,
};
