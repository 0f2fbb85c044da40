//! Presentation layer.
//!
//! * [`markup`] — transport-neutral [`Reply`], [`Keyboard`], [`Button`] and
//!   the [`Action`] tags carried by inline buttons.
//! * [`format`] — pure functions rendering every view the bot can show.

pub mod format;
pub mod markup;

pub use markup::{Action, Button, ButtonTarget, Keyboard, Reply, TextFormat};
