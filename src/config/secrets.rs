//! Service credentials read from the process environment.
//!
//! The three secrets are never stored in `settings.toml`.  A missing or empty
//! variable is a startup error; `main` aborts before the dispatcher starts.

use std::fmt;

use thiserror::Error;

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the AudD API token.
pub const AUDD_KEY_VAR: &str = "AUDD_API_KEY";
/// Environment variable holding the Genius bearer token.
pub const GENIUS_TOKEN_VAR: &str = "GENIUS_ACCESS_TOKEN";

/// Errors raised while assembling startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required secret is absent or blank.
    #[error("required environment variable {0} is not set")]
    MissingSecret(&'static str),

    /// `settings.toml` exists but could not be read or parsed.
    #[error("invalid settings file: {0}")]
    Settings(String),
}

/// The three credentials the bot needs to talk to its collaborators.
#[derive(Clone)]
pub struct Secrets {
    pub bot_token: String,
    pub audd_api_key: String,
    pub genius_access_token: String,
}

impl Secrets {
    /// Read all secrets from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read all secrets through `lookup`, which maps a variable name to its
    /// value.  Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingSecret(name))
        };

        Ok(Self {
            bot_token: require(BOT_TOKEN_VAR)?,
            audd_api_key: require(AUDD_KEY_VAR)?,
            genius_access_token: require(GENIUS_TOKEN_VAR)?,
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("bot_token", &"<redacted>")
            .field("audd_api_key", &"<redacted>")
            .field("genius_access_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn all_present_loads() {
        let vars = env(&[
            (BOT_TOKEN_VAR, "123:abc"),
            (AUDD_KEY_VAR, "audd"),
            (GENIUS_TOKEN_VAR, "genius"),
        ]);
        let secrets = Secrets::from_lookup(|k| vars.get(k).cloned()).expect("secrets");
        assert_eq!(secrets.bot_token, "123:abc");
        assert_eq!(secrets.audd_api_key, "audd");
        assert_eq!(secrets.genius_access_token, "genius");
    }

    #[test]
    fn missing_secret_names_the_variable() {
        let vars = env(&[(BOT_TOKEN_VAR, "123:abc"), (GENIUS_TOKEN_VAR, "genius")]);
        let err = Secrets::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(AUDD_KEY_VAR)));
        assert!(err.to_string().contains(AUDD_KEY_VAR));
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let vars = env(&[
            (BOT_TOKEN_VAR, "   "),
            (AUDD_KEY_VAR, "audd"),
            (GENIUS_TOKEN_VAR, "genius"),
        ]);
        let err = Secrets::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(BOT_TOKEN_VAR)));
    }

    #[test]
    fn debug_output_is_redacted() {
        let secrets = Secrets {
            bot_token: "123:very-secret".into(),
            audd_api_key: "audd-secret".into(),
            genius_access_token: "genius-secret".into(),
        };
        let shown = format!("{secrets:?}");
        assert!(!shown.contains("very-secret"));
        assert!(!shown.contains("audd-secret"));
        assert!(!shown.contains("genius-secret"));
    }
}
