//! Transport-neutral reply values: text, text format and inline buttons.

use std::fmt;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Named view reachable from an inline button.
///
/// The tag travels through the chat platform as opaque callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Stats,
    History,
    Help,
    About,
    LyricsHelp,
    LyricsExample,
    NewSearch,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Stats,
        Action::History,
        Action::Help,
        Action::About,
        Action::LyricsHelp,
        Action::LyricsExample,
        Action::NewSearch,
    ];

    /// Callback data carried by the button.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Stats => "stats",
            Action::History => "history",
            Action::Help => "help",
            Action::About => "about",
            Action::LyricsHelp => "lyrics_help",
            Action::LyricsExample => "lyrics_example",
            Action::NewSearch => "new_search",
        }
    }

    /// Resolve callback data back into an action.  Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.tag() == tag)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Button / Keyboard
// ---------------------------------------------------------------------------

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonTarget {
    /// Sends the action's tag back to the bot.
    Action(Action),
    /// Opens a URL in the user's client.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub target: ButtonTarget,
}

impl Button {
    pub fn action(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Action(action),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Url(url.into()),
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self.target, ButtonTarget::Url(_))
    }
}

/// Inline keyboard laid out in rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// No buttons.
    pub fn none() -> Self {
        Self::default()
    }

    /// Lay `buttons` out left to right, `columns` per row.
    pub fn grid(buttons: Vec<Button>, columns: usize) -> Self {
        let columns = columns.max(1);
        let mut rows = Vec::with_capacity(buttons.len().div_ceil(columns));
        let mut iter = buttons.into_iter().peekable();
        while iter.peek().is_some() {
            rows.push(iter.by_ref().take(columns).collect());
        }
        Self { rows }
    }

    /// One button per row.
    pub fn column(buttons: Vec<Button>) -> Self {
        Self::grid(buttons, 1)
    }

    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// How the chat client should interpret the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Telegram HTML subset (`<b>`, `<i>`, `<code>`).
    Html,
    Plain,
}

/// A rendered view: text plus inline buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            keyboard: Keyboard::none(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            keyboard: Keyboard::none(),
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = keyboard;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_tag_round_trips() {
        for action in Action::ALL {
            assert_eq!(Action::from_tag(action.tag()), Some(action));
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(Action::from_tag("play_song"), None);
        assert_eq!(Action::from_tag(""), None);
    }

    #[test]
    fn grid_fills_rows_left_to_right() {
        let buttons = (0..5)
            .map(|i| Button::action(format!("b{i}"), Action::Help))
            .collect();
        let kb = Keyboard::grid(buttons, 2);

        let sizes: Vec<_> = kb.rows().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(kb.rows()[2][0].label, "b4");
    }

    #[test]
    fn zero_columns_treated_as_one() {
        let kb = Keyboard::grid(vec![Button::url("x", "https://a"), Button::url("y", "https://b")], 0);
        assert_eq!(kb.rows().len(), 2);
    }

    #[test]
    fn empty_keyboard() {
        assert!(Keyboard::none().is_empty());
        assert!(Keyboard::grid(Vec::new(), 2).is_empty());
        assert!(!Keyboard::column(vec![Button::action("a", Action::About)]).is_empty());
    }
}
