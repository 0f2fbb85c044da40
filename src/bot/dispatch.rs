//! teloxide dispatcher wiring.
//!
//! Converts message and callback-query updates into [`Inbound`] events and
//! hands them to the shared [`Router`].  Updates from one chat are processed
//! in order; different chats run concurrently.

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message, User};

use super::event::{Content, Inbound, MediaKind, Payload, Sender};
use super::router::Router;

/// Run the long-polling loop until Ctrl-C.
pub async fn run(bot: Bot, router: Arc<Router>) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|update| async move {
            log::debug!("ignoring unsupported update {:?}", update.kind);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_message(msg: Message, router: Arc<Router>) -> ResponseResult<()> {
    match message_event(&msg) {
        Some(event) => router.handle(event).await,
        None => log::debug!("ignoring message {} without sender", msg.id),
    }
    Ok(())
}

async fn on_callback(query: CallbackQuery, router: Arc<Router>) -> ResponseResult<()> {
    router.handle(callback_event(&query)).await;
    Ok(())
}

fn sender(user: &User) -> Sender {
    Sender {
        id: user.id.0,
        first_name: user.first_name.clone(),
    }
}

/// `None` for messages with no sending user (channel posts).
pub fn message_event(msg: &Message) -> Option<Inbound> {
    let user = msg.from.as_ref()?;

    let content = if let Some(audio) = msg.audio() {
        Content::Media {
            kind: MediaKind::Audio,
            file_id: audio.file.id.clone(),
        }
    } else if let Some(voice) = msg.voice() {
        Content::Media {
            kind: MediaKind::Voice,
            file_id: voice.file.id.clone(),
        }
    } else if let Some(video) = msg.video() {
        Content::Media {
            kind: MediaKind::Video,
            file_id: video.file.id.clone(),
        }
    } else if let Some(text) = msg.text() {
        Content::Text(text.to_string())
    } else {
        Content::Other
    };

    Some(Inbound {
        sender: sender(user),
        chat: msg.chat.id,
        payload: Payload::Message {
            message_id: msg.id,
            content,
        },
    })
}

/// Button presses on inaccessible messages fall back to the user's private chat.
pub fn callback_event(query: &CallbackQuery) -> Inbound {
    let chat = query
        .message
        .as_ref()
        .map(|message| message.chat().id)
        .unwrap_or_else(|| query.from.id.into());

    Inbound {
        sender: sender(&query.from),
        chat,
        payload: Payload::ButtonPress {
            callback_id: query.id.clone(),
            tag: query.data.clone(),
        },
    }
}
