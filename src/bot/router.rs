//! Dialogue router: turns one [`Inbound`] event into replies.
//!
//! # Flows
//!
//! ```text
//! command (/start /help /about /stats /history)
//!   └─▶ render view, reply to the command
//!
//! media (audio / voice / video)
//!   └─▶ media_url ─▶ send "Analyzing" ─▶ recognize (+ animated edits)
//!         ├─ match    → edit into song card, then record_match
//!         └─ no match → edit into failure text
//!       (a failed final edit is retried once with plain failure text)
//!
//! /lyrics <query>
//!   └─▶ send "Searching" ─▶ lyrics search
//!         ├─ hits     → edit into ranked list, then record_lyrics_result(top)
//!         └─ none/err → edit into "No Songs Found"
//!
//! button press
//!   └─▶ send the tagged view as a new message, always acknowledge
//! ```
//!
//! [`Router::handle`] never fails: handler errors are logged and turned into
//! a generic reply, so one bad event cannot affect the next.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::AppConfig;
use crate::lyrics::LyricsSearch;
use crate::recognition::{RecognitionError, Recognizer};
use crate::session::SessionStore;
use crate::song::{HistoryEntry, SongMatch};
use crate::transport::{ChatId, ChatTransport, MessageId, TransportError};
use crate::view::{format, Action, Reply};

use super::event::{classify, Inbound, MediaKind, Route, Sender};

// ---------------------------------------------------------------------------
// HandlerError
// ---------------------------------------------------------------------------

/// Errors that abort a handler.  The user only ever sees generic text.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The chat platform rejected or failed a call.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The event cannot be handled as sent.
    #[error("invalid input: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// RouterSettings
// ---------------------------------------------------------------------------

/// Behaviour switches taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Entries shown by the history view.
    pub history_limit: usize,
    /// Animate the provisional reply while recognition runs.
    pub progress_animation: bool,
    /// Delay between animation frames.
    pub progress_interval: Duration,
    /// Count failed searches in the statistics.
    pub count_failed_searches: bool,
}

impl From<&AppConfig> for RouterSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            history_limit: config.ui.history_limit,
            progress_animation: config.ui.progress_animation,
            progress_interval: Duration::from_millis(config.ui.progress_interval_ms),
            count_failed_searches: config.stats.count_failed_searches,
        }
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatches inbound events to handlers.
///
/// Holds the two service clients, the transport and the session store; all
/// are injected so tests can substitute fakes.
pub struct Router {
    transport: Arc<dyn ChatTransport>,
    recognizer: Arc<dyn Recognizer>,
    lyrics: Arc<dyn LyricsSearch>,
    sessions: SessionStore,
    settings: RouterSettings,
}

impl Router {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        recognizer: Arc<dyn Recognizer>,
        lyrics: Arc<dyn LyricsSearch>,
        sessions: SessionStore,
        settings: RouterSettings,
    ) -> Self {
        Self {
            transport,
            recognizer,
            lyrics,
            sessions,
            settings,
        }
    }

    /// The store this router records into.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one event end to end.  Never fails and never panics on remote
    /// errors; failures are logged and answered with a generic reply.
    pub async fn handle(&self, event: Inbound) {
        let route = classify(&event);
        if let Err(e) = self.dispatch(&event, &route).await {
            log::error!(
                "handling {route:?} for user {} failed: {e}",
                event.sender.id
            );
            self.report_failure(&event, &route).await;
        }
    }

    async fn dispatch(&self, event: &Inbound, route: &Route<'_>) -> Result<(), HandlerError> {
        match *route {
            Route::Start => {
                self.sessions.get_or_create(event.sender.id);
                log_action(&event.sender, "started using the bot");
                self.reply(event, &format::welcome()).await
            }
            Route::Help => {
                log_action(&event.sender, "requested help");
                self.reply(event, &format::help()).await
            }
            Route::About => {
                log_action(&event.sender, "viewed about info");
                self.reply(event, &format::about()).await
            }
            Route::Stats => {
                log_action(&event.sender, "checked their stats");
                let session = self.sessions.get_or_create(event.sender.id);
                self.reply(event, &format::stats(&session)).await
            }
            Route::History => {
                log_action(&event.sender, "viewed their history");
                let session = self.sessions.get_or_create(event.sender.id);
                self.reply(event, &format::history(&session, self.settings.history_limit))
                    .await
            }
            Route::LyricsEmptyQuery => {
                log_action(&event.sender, "attempted lyrics search without query");
                self.reply(event, &format::lyrics_usage()).await
            }
            Route::LyricsQuery(query) => self.on_lyrics(event, query).await,
            Route::MediaSubmission { kind, file_id } => self.on_media(event, kind, file_id).await,
            Route::ButtonPress { callback_id, tag } => {
                self.on_button(event, callback_id, tag).await;
                Ok(())
            }
            Route::UnrecognizedText => {
                log_action(&event.sender, "sent an unrecognized message");
                self.reply(event, &format::unrecognized()).await
            }
        }
    }

    // -----------------------------------------------------------------------
    // Media recognition
    // -----------------------------------------------------------------------

    async fn on_media(
        &self,
        event: &Inbound,
        kind: MediaKind,
        file_id: &str,
    ) -> Result<(), HandlerError> {
        log_action(
            &event.sender,
            format_args!("submitted a {kind} file for recognition"),
        );

        let media_url = self.transport.media_url(file_id).await?;
        let provisional = self
            .transport
            .send(event.chat, event.message_id(), &format::processing(0))
            .await?;

        let delivered = match self
            .recognize_with_progress(event.chat, provisional, &media_url)
            .await
        {
            Ok(song) => {
                log_action(
                    &event.sender,
                    format_args!("found song: {} by {}", song.title, song.artist),
                );
                let delivered = self
                    .transport
                    .edit(event.chat, provisional, &format::song_match(&song))
                    .await;
                if delivered.is_ok() {
                    self.sessions
                        .record_match(event.sender.id, HistoryEntry::from(&song));
                }
                delivered
            }
            Err(e) => {
                if e.is_no_match() {
                    log_action(&event.sender, "no song match found");
                } else {
                    log::warn!("recognition failed for user {}: {e}", event.sender.id);
                }
                if self.settings.count_failed_searches {
                    self.sessions.record_search(event.sender.id);
                }
                self.transport
                    .edit(event.chat, provisional, &format::recognition_failed())
                    .await
            }
        };

        match delivered {
            Ok(()) => Ok(()),
            Err(e) => {
                self.resolve_provisional(event.chat, provisional, &format::processing_failed(), e)
                    .await
            }
        }
    }

    /// Run recognition while cycling the provisional reply through the
    /// processing frames.  Stops animating as soon as recognition returns;
    /// at most `PROCESSING_FRAMES.len() - 1` edits are made.
    async fn recognize_with_progress(
        &self,
        chat: ChatId,
        provisional: MessageId,
        media_url: &str,
    ) -> Result<SongMatch, RecognitionError> {
        let mut recognition = self.recognizer.recognize(media_url);
        if !self.settings.progress_animation {
            return recognition.await;
        }

        let mut frame = 0;
        loop {
            tokio::select! {
                result = &mut recognition => return result,
                _ = tokio::time::sleep(self.settings.progress_interval),
                    if frame + 1 < format::PROCESSING_FRAMES.len() =>
                {
                    frame += 1;
                    // Cosmetic only.
                    if let Err(e) = self
                        .transport
                        .edit(chat, provisional, &format::processing(frame))
                        .await
                    {
                        log::debug!("progress edit {frame} failed: {e}");
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lyrics search
    // -----------------------------------------------------------------------

    async fn on_lyrics(&self, event: &Inbound, query: &str) -> Result<(), HandlerError> {
        log_action(&event.sender, format_args!("searched lyrics: '{query}'"));

        let provisional = self
            .transport
            .send(event.chat, event.message_id(), &format::searching())
            .await?;

        let hits = match self.lyrics.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("lyrics search failed for user {}: {e}", event.sender.id);
                Vec::new()
            }
        };

        let delivered = match hits.first() {
            None => {
                log_action(&event.sender, "no lyrics matches found");
                if self.settings.count_failed_searches {
                    self.sessions.record_search(event.sender.id);
                }
                self.transport
                    .edit(event.chat, provisional, &format::lyrics_not_found())
                    .await
            }
            Some(top) => {
                log_action(
                    &event.sender,
                    format_args!("found {} songs matching lyrics", hits.len()),
                );
                let delivered = self
                    .transport
                    .edit(event.chat, provisional, &format::lyrics_results(query, &hits))
                    .await;
                if delivered.is_ok() {
                    self.sessions
                        .record_lyrics_result(event.sender.id, HistoryEntry::from(top));
                }
                delivered
            }
        };

        match delivered {
            Ok(()) => Ok(()),
            Err(e) => {
                self.resolve_provisional(event.chat, provisional, &format::lyrics_failed(), e)
                    .await
            }
        }
    }

    // -----------------------------------------------------------------------
    // Buttons
    // -----------------------------------------------------------------------

    /// Render the pressed view, then acknowledge the press whatever happened.
    async fn on_button(&self, event: &Inbound, callback_id: &str, tag: Option<&str>) {
        log_action(
            &event.sender,
            format_args!("clicked button: {}", tag.unwrap_or("<none>")),
        );

        let outcome = match tag {
            None => Err(HandlerError::Validation(
                "button press without callback data".into(),
            )),
            Some(tag) => match Action::from_tag(tag) {
                Some(action) => self.show_action(event, action).await,
                None => {
                    log::warn!("ignoring unknown button tag {tag:?}");
                    Ok(())
                }
            },
        };

        let notice = match &outcome {
            Ok(()) => None,
            Err(e) => {
                log::error!("button {tag:?} for user {} failed: {e}", event.sender.id);
                Some(format::CALLBACK_FAILURE)
            }
        };

        if let Err(e) = self.transport.acknowledge(callback_id, notice).await {
            log::warn!("could not acknowledge button press {callback_id}: {e}");
        }
    }

    async fn show_action(&self, event: &Inbound, action: Action) -> Result<(), HandlerError> {
        let reply = match action {
            Action::Stats => format::stats(&self.sessions.get_or_create(event.sender.id)),
            Action::History => format::history(
                &self.sessions.get_or_create(event.sender.id),
                self.settings.history_limit,
            ),
            Action::Help => format::help(),
            Action::About => format::about(),
            Action::LyricsHelp => format::lyrics_help(),
            Action::LyricsExample => format::lyrics_example(),
            Action::NewSearch => format::new_search(),
        };
        self.transport.send(event.chat, None, &reply).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Reply to the triggering message.
    async fn reply(&self, event: &Inbound, reply: &Reply) -> Result<(), HandlerError> {
        self.transport
            .send(event.chat, event.message_id(), reply)
            .await?;
        Ok(())
    }

    /// Replace a provisional reply whose final edit failed with plain
    /// failure text.  Only if this edit fails as well does the error reach
    /// [`Router::handle`], which then sends a fresh failure reply.
    async fn resolve_provisional(
        &self,
        chat: ChatId,
        provisional: MessageId,
        fallback: &Reply,
        cause: TransportError,
    ) -> Result<(), HandlerError> {
        log::warn!("final edit of message {provisional} in chat {chat} failed: {cause}");
        self.transport.edit(chat, provisional, fallback).await?;
        Ok(())
    }

    async fn report_failure(&self, event: &Inbound, route: &Route<'_>) {
        let reply = match route {
            Route::LyricsQuery(_) => format::lyrics_failed(),
            _ => format::processing_failed(),
        };
        if let Err(e) = self
            .transport
            .send(event.chat, event.message_id(), &reply)
            .await
        {
            log::error!(
                "could not deliver failure notice to chat {}: {e}",
                event.chat
            );
        }
    }
}

fn log_action(sender: &Sender, action: impl fmt::Display) {
    log::info!("user {} (id {}): {action}", sender.first_name, sender.id);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
