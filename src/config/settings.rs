//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// TelegramConfig
// ---------------------------------------------------------------------------

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Base URL of the Bot API; file download URLs are built as
    /// `{api_base}/file/bot<token>/<file_path>`.
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecognitionConfig
// ---------------------------------------------------------------------------

/// Settings for the AudD recognition service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Endpoint that receives the recognition form POST.
    pub base_url: String,
    /// Comma-separated provider blocks requested in the `return` field.
    pub return_fields: String,
    /// Maximum seconds to wait for a recognition response.
    pub timeout_secs: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.audd.io/".into(),
            return_fields: "apple_music,spotify".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// LyricsConfig
// ---------------------------------------------------------------------------

/// Settings for the Genius lyrics search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// API root; searches go to `{base_url}/search`.
    pub base_url: String,
    /// Number of hits kept from the ranked response.
    pub max_results: usize,
    /// Maximum seconds to wait for a search response.
    pub timeout_secs: u64,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.genius.com".into(),
            max_results: 5,
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Chat presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Number of history entries shown by `/history`.
    pub history_limit: usize,
    /// Animate the "Analyzing your file" reply while recognition runs.
    pub progress_animation: bool,
    /// Delay between animation frames in milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            progress_animation: true,
            progress_interval_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// StatsConfig
// ---------------------------------------------------------------------------

/// How searches are counted in the per-user statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Count failed recognitions and empty lyrics searches as searches.
    /// When `false` only successful outcomes increment the search counter.
    pub count_failed_searches: bool,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use music_recognition_bot::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.lyrics.max_results > 0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub recognition: RecognitionConfig,
    pub lyrics: LyricsConfig,
    pub ui: UiConfig,
    pub stats: StatsConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
