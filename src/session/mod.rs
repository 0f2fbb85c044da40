//! Per-user session statistics held in memory for the process lifetime.
//!
//! * [`UserSession`] — counters, search history and join date of one user.
//! * [`SessionStore`] — cheap-to-clone handle owning every session; the only
//!   way to mutate one.

pub mod store;

pub use store::{SessionStore, UserId, UserSession};
