//! Application entry point — Music Detective bot.
//!
//! # Startup sequence
//!
//! 1. Load `.env` (if present) and initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults on first run).
//! 3. Read secrets from the environment; any missing secret is fatal.
//! 4. Build the Telegram bot and confirm its identity with `getMe`.
//! 5. Build the AudD and Genius clients, the session store and the router.
//! 6. Run the dispatcher until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;

use music_recognition_bot::{
    bot::{dispatch, Router, RouterSettings},
    config::{AppConfig, ConfigError, Secrets},
    lyrics::{GeniusClient, LyricsSearch},
    recognition::{AuddClient, Recognizer},
    session::SessionStore,
    transport::{ChatTransport, TelegramTransport},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment + logging
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env file: {e}");
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("==================================================");
    log::info!("Music Detective bot starting up");
    log::info!("started at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    log::info!("==================================================");

    // 2. Configuration
    let config = AppConfig::load()
        .map_err(|e| ConfigError::Settings(format!("{e:#}")))
        .context("loading settings.toml")?;

    // 3. Secrets
    let secrets = Secrets::from_env().context("reading secrets from the environment")?;

    // 4. Telegram
    let api_url = reqwest::Url::parse(&config.telegram.api_base)
        .with_context(|| format!("invalid telegram.api_base {:?}", config.telegram.api_base))?;
    let bot = Bot::new(secrets.bot_token.clone()).set_api_url(api_url);
    let me = bot.get_me().await.context("getMe failed; is TELEGRAM_BOT_TOKEN valid?")?;
    log::info!("running as @{} (id {})", me.username(), me.id);

    // 5. Services + router
    let recognizer: Arc<dyn Recognizer> = Arc::new(AuddClient::from_config(
        &config.recognition,
        secrets.audd_api_key.clone(),
    ));
    let lyrics: Arc<dyn LyricsSearch> = Arc::new(GeniusClient::from_config(
        &config.lyrics,
        secrets.genius_access_token.clone(),
    ));
    let transport: Arc<dyn ChatTransport> = Arc::new(TelegramTransport::new(
        bot.clone(),
        secrets.bot_token.clone(),
        config.telegram.api_base.clone(),
    ));

    let router = Arc::new(Router::new(
        transport,
        recognizer,
        lyrics,
        SessionStore::new(),
        RouterSettings::from(&config),
    ));

    // 6. Dispatch
    log::info!("bot is ready, waiting for updates (Ctrl-C to stop)");
    dispatch::run(bot, router).await;
    log::info!("bot stopped");
    Ok(())
}
