//! Presentation formatter: domain values → [`Reply`] values.
//!
//! Every function here is pure.  Text is Telegram HTML; anything that comes
//! from a user or a remote service goes through [`escape`] first.

use teloxide::utils::html::escape;

use crate::session::UserSession;
use crate::song::{LyricsHit, SongMatch};

use super::markup::{Action, Button, Keyboard, Reply};

/// Rendered in place of a missing album or release date.
pub const PLACEHOLDER: &str = "N/A";

/// Example query suggested by the lyrics hints.
pub const EXAMPLE_QUERY: &str = "we will rock you";

/// Notice attached to a button acknowledgement when handling failed.
pub const CALLBACK_FAILURE: &str = "An error occurred. Please try again.";

/// Most history entries the history view ever shows.
pub const HISTORY_LIMIT: usize = 10;

/// Frames of the provisional reply shown while a file is analysed.
pub const PROCESSING_FRAMES: [&str; 4] = [
    "🎵 Analyzing your file",
    "🎵 Analyzing your file.",
    "🎵 Analyzing your file..",
    "🎵 Analyzing your file...",
];

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

fn main_menu() -> Keyboard {
    Keyboard::grid(
        vec![
            Button::action("📊 Statistics", Action::Stats),
            Button::action("📜 History", Action::History),
            Button::action("ℹ️ Help", Action::Help),
            Button::action("👾 About", Action::About),
        ],
        2,
    )
}

pub fn welcome() -> Reply {
    Reply::html(
        "🎵 <b>Welcome to Music Recognition Bot!</b>\n\n\
         I'm your personal music detective! Here's what I can do:\n\n\
         🎧 <b>Identify Songs From:</b>\n\
         • Audio files 🎵\n\
         • Voice messages 🎤\n\
         • Video files 🎥\n\
         • Song lyrics 📝\n\n\
         <b>Quick Start:</b>\n\
         1️⃣ Send any audio/voice/video\n\
         2️⃣ Or use /lyrics to search by text\n\
         3️⃣ Get instant song matches!\n\n\
         Use the menu below to explore more features! 👇",
    )
    .with_keyboard(main_menu())
}

pub fn help() -> Reply {
    Reply::html(format!(
        "<b>🤖 Bot Commands &amp; Features</b>\n\n\
         <b>Main Commands:</b>\n\
         • /start - Launch the bot\n\
         • /stats - Your usage statistics\n\
         • /history - Recent searches\n\
         • /about - Bot information\n\
         • /help - Show this help\n\n\
         <b>Music Recognition:</b>\n\
         • Send any audio file 🎵\n\
         • Record a voice message 🎤\n\
         • Share a video clip 🎥\n\n\
         <b>Lyrics Search:</b>\n\
         • Use /lyrics + text 📝\n\
         Example: <code>/lyrics {EXAMPLE_QUERY}</code>\n\n\
         <i>Select an option below:</i> 👇"
    ))
    .with_keyboard(Keyboard::grid(
        vec![
            Button::action("🔍 Try Lyrics Search", Action::LyricsHelp),
            Button::action("📊 View Stats", Action::Stats),
            Button::action("📜 View History", Action::History),
            Button::action("ℹ️ About Bot", Action::About),
        ],
        2,
    ))
}

pub fn about() -> Reply {
    Reply::html(
        "<b>🎵 Music Recognition Bot</b>\n\n\
         <b>Features:</b>\n\
         • Instant song recognition 🎧\n\
         • Support for multiple file types 📁\n\
         • Lyrics search functionality 📝\n\
         • Personal usage statistics 📊\n\
         • Search history tracking 📜\n\n\
         <b>Technologies:</b>\n\
         • AuDD Music Recognition API 🎵\n\
         • Genius Lyrics API 📚\n\
         • Spotify Integration 🎧\n\
         • Apple Music Integration 🎵\n\n\
         What would you like to do? 👇",
    )
    .with_keyboard(Keyboard::grid(
        vec![
            Button::action("🎵 Start Using", Action::NewSearch),
            Button::action("❓ Help", Action::Help),
            Button::action("⭐️ View Stats", Action::Stats),
            Button::action("📜 History", Action::History),
        ],
        2,
    ))
}

pub fn unrecognized() -> Reply {
    Reply::html(
        "<b>How Can I Help You?</b> 🤔\n\n\
         Send me:\n\
         • Audio file 🎵\n\
         • Voice message 🎤\n\
         • Video file 🎥\n\
         • Use /lyrics + text 📝\n\n\
         <i>Choose an option below or send me a file!</i> 👇",
    )
    .with_keyboard(Keyboard::grid(
        vec![
            Button::action("📖 View Commands", Action::Help),
            Button::action("🔍 Search Lyrics", Action::LyricsHelp),
            Button::action("📊 My Stats", Action::Stats),
            Button::action("ℹ️ About", Action::About),
        ],
        2,
    ))
}

pub fn new_search() -> Reply {
    Reply::html(
        "<b>Ready for Another Song!</b> 🎵\n\n\
         You can:\n\
         • Send an audio file 🎵\n\
         • Send a voice message 🎤\n\
         • Send a video file 🎥\n\
         • Use /lyrics to search by lyrics 📝",
    )
    .with_keyboard(main_menu())
}

// ---------------------------------------------------------------------------
// Session views
// ---------------------------------------------------------------------------

pub fn stats(session: &UserSession) -> Reply {
    Reply::html(format!(
        "<b>📊 Your Music Detective Stats</b>\n\n\
         <b>Activity Overview:</b>\n\
         • Total Searches: <code>{}</code>\n\
         • Successful Matches: <code>{}</code>\n\
         • Success Rate: <code>{:.1}%</code>\n\
         • Member Since: <code>{}</code>\n\n\
         <i>Select an option below:</i> 👇",
        session.search_count(),
        session.successful_match_count(),
        session.success_rate(),
        session.joined().format("%Y-%m-%d"),
    ))
    .with_keyboard(Keyboard::grid(
        vec![
            Button::action("📜 View History", Action::History),
            Button::action("🔍 New Search", Action::NewSearch),
        ],
        2,
    ))
}

/// The last `limit` history entries in append order, or a getting-started
/// hint when the history is empty.  `limit` is clamped to
/// `1..=HISTORY_LIMIT`.
pub fn history(session: &UserSession, limit: usize) -> Reply {
    let limit = limit.clamp(1, HISTORY_LIMIT);
    let keyboard = Keyboard::grid(
        vec![
            Button::action("🔍 New Search", Action::NewSearch),
            Button::action("📊 View Stats", Action::Stats),
        ],
        2,
    );

    let recent = session.recent_history(limit);
    if recent.is_empty() {
        return Reply::html(
            "<b>No Search History Yet</b> 🎵\n\n\
             Start by:\n\
             • Sending an audio file\n\
             • Recording a voice message\n\
             • Using /lyrics to search\n\n\
             <i>Try your first search!</i> 👇",
        )
        .with_keyboard(keyboard);
    }

    let mut text = format!(
        "<b>🕒 Your Recent Music Discoveries</b>\n\n<i>Last {} searches:</i>\n\n",
        recent.len()
    );
    for entry in recent {
        text.push_str(&format!(
            "• <code>{}</code> - <i>{}</i>\n",
            escape(&entry.title),
            escape(&entry.artist)
        ));
    }
    text.push_str("\n<i>What would you like to do next?</i> 👇");

    Reply::html(text).with_keyboard(keyboard)
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// Provisional reply for a media submission; `frame` wraps around.
pub fn processing(frame: usize) -> Reply {
    Reply::plain(PROCESSING_FRAMES[frame % PROCESSING_FRAMES.len()])
}

/// Song card: details plus one button per available provider and a
/// "New Search" button.
pub fn song_match(song: &SongMatch) -> Reply {
    let text = format!(
        "<b>✨ Found Your Song!</b>\n\n\
         <b>🎵 Title:</b> <code>{}</code>\n\
         <b>👤 Artist:</b> <code>{}</code>\n\
         <b>💿 Album:</b> <code>{}</code>\n\
         <b>📅 Released:</b> <code>{}</code>\n\n\
         <i>Click the buttons below to listen:</i> 👇",
        escape(&song.title),
        escape(&song.artist),
        escape(song.album.as_deref().unwrap_or(PLACEHOLDER)),
        escape(song.release_date.as_deref().unwrap_or(PLACEHOLDER)),
    );

    let mut buttons: Vec<Button> = song
        .streaming_links
        .iter()
        .map(|(provider, url)| Button::url(provider.button_label(), url.clone()))
        .collect();
    buttons.push(Button::action("🔍 New Search", Action::NewSearch));

    Reply::html(text).with_keyboard(Keyboard::grid(buttons, 2))
}

pub fn recognition_failed() -> Reply {
    Reply::plain(
        "Sorry, I couldn't identify that song. \
         Please try again with a different part of the song.",
    )
}

pub fn processing_failed() -> Reply {
    Reply::plain(
        "Sorry, something went wrong while processing your request. \
         Please try again later.",
    )
}

// ---------------------------------------------------------------------------
// Lyrics
// ---------------------------------------------------------------------------

/// Shown for `/lyrics` without a query.
pub fn lyrics_usage() -> Reply {
    Reply::html(format!(
        "<b>How to Search by Lyrics</b> 🎵\n\n\
         Type /lyrics followed by some lyrics you remember.\n\n\
         Example: <code>/lyrics {EXAMPLE_QUERY}</code>\n\n\
         <i>Click the button below to try an example!</i> 👇"
    ))
    .with_keyboard(Keyboard::column(vec![Button::action(
        "📝 Try an Example",
        Action::LyricsExample,
    )]))
}

pub fn lyrics_help() -> Reply {
    Reply::html(format!(
        "<b>Search by Lyrics</b> 🎵\n\n\
         Type /lyrics followed by some lyrics you remember.\n\n\
         Example: <code>/lyrics {EXAMPLE_QUERY}</code>"
    ))
}

pub fn lyrics_example() -> Reply {
    Reply::plain(format!("/lyrics {EXAMPLE_QUERY}"))
}

pub fn searching() -> Reply {
    Reply::html("🔍 <b>Searching for matching songs...</b>")
}

pub fn lyrics_not_found() -> Reply {
    Reply::html(
        "<b>No Songs Found</b> 😕\n\n\
         Try:\n\
         • Using different lyrics\n\
         • Checking for typos\n\
         • Using a longer portion of the lyrics\n\n\
         <i>Click below to try another search!</i> 👇",
    )
    .with_keyboard(Keyboard::column(vec![Button::action(
        "🔄 Try Another Search",
        Action::LyricsHelp,
    )]))
}

/// Ranked hits as one link button per row, in the order given.
pub fn lyrics_results(query: &str, hits: &[LyricsHit]) -> Reply {
    let text = format!(
        "<b>✨ Found {} Matching Songs!</b>\n\n\
         <b>Your Lyrics:</b> <code>{}</code>\n\n\
         <i>Click on a song to see full lyrics:</i> 👇",
        hits.len(),
        escape(query),
    );

    let mut buttons: Vec<Button> = hits
        .iter()
        .map(|hit| Button::url(format!("🎵 {} - {}", hit.title, hit.artist), hit.url.clone()))
        .collect();
    buttons.push(Button::action("🔍 New Lyrics Search", Action::LyricsHelp));

    Reply::html(text).with_keyboard(Keyboard::column(buttons))
}

pub fn lyrics_failed() -> Reply {
    Reply::plain(
        "Sorry, something went wrong while searching for lyrics. \
         Please try again later.",
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
