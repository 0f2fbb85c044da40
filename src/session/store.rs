//! In-memory session store.
//!
//! [`SessionStore`] wraps an `Arc<Mutex<HashMap<UserId, UserSession>>>`.
//! Every operation takes the lock once and applies all of its effects inside
//! that critical section, so `successful_match_count <= search_count` holds
//! for every reader.  The lock is never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};

use crate::song::HistoryEntry;

/// Numeric identity of a chat user.
pub type UserId = u64;

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

// ---------------------------------------------------------------------------
// UserSession
// ---------------------------------------------------------------------------

/// Usage statistics and search history of one user.
///
/// Fields are private; only [`SessionStore`] mutates a session.  Callers get
/// snapshots (clones).
#[derive(Debug, Clone, PartialEq)]
pub struct UserSession {
    search_count: u32,
    successful_match_count: u32,
    history: Vec<HistoryEntry>,
    joined: NaiveDate,
}

impl UserSession {
    fn new(joined: NaiveDate) -> Self {
        Self {
            search_count: 0,
            successful_match_count: 0,
            history: Vec::new(),
            joined,
        }
    }

    pub fn search_count(&self) -> u32 {
        self.search_count
    }

    pub fn successful_match_count(&self) -> u32 {
        self.successful_match_count
    }

    /// Date of the user's first interaction.
    pub fn joined(&self) -> NaiveDate {
        self.joined
    }

    /// Full history, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The last `limit` history entries, oldest first.
    pub fn recent_history(&self, limit: usize) -> &[HistoryEntry] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }

    /// Percentage of searches that produced a recognition match; `0.0` before
    /// the first search.
    pub fn success_rate(&self) -> f64 {
        if self.search_count == 0 {
            return 0.0;
        }
        f64::from(self.successful_match_count) / f64::from(self.search_count) * 100.0
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Owner of every [`UserSession`].
///
/// Cheap to clone (`Arc` clone); clones share the same sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<UserId, UserSession>>>,
    today: Clock,
}

impl SessionStore {
    /// Create an empty store stamping new sessions with the local date.
    pub fn new() -> Self {
        Self::with_clock(|| Local::now().date_naive())
    }

    /// Create an empty store with a custom source for "today" (useful for
    /// tests).
    pub fn with_clock<F>(today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            today: Arc::new(today),
        }
    }

    /// Return the session for `user`, creating it on first contact.
    ///
    /// The join date is set only when the session is created; later calls
    /// neither move it nor reset the counters.
    pub fn get_or_create(&self, user: UserId) -> UserSession {
        self.update(user, |_| {})
    }

    /// Count one search without a match or history entry.
    pub fn record_search(&self, user: UserId) -> UserSession {
        self.update(user, |session| {
            session.search_count += 1;
        })
    }

    /// Count one successful lyrics search and remember its top hit.
    pub fn record_lyrics_result(&self, user: UserId, entry: HistoryEntry) -> UserSession {
        self.update(user, move |session| {
            session.search_count += 1;
            session.history.push(entry);
        })
    }

    /// Count one successful recognition: bumps both counters and appends the
    /// matched song to the history.
    pub fn record_match(&self, user: UserId, entry: HistoryEntry) -> UserSession {
        self.update(user, move |session| {
            session.search_count += 1;
            session.successful_match_count += 1;
            session.history.push(entry);
        })
    }

    /// Number of users seen so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` before the first interaction.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn update<F>(&self, user: UserId, apply: F) -> UserSession
    where
        F: FnOnce(&mut UserSession),
    {
        let mut sessions = self.lock();
        let session = sessions
            .entry(user)
            .or_insert_with(|| UserSession::new((self.today)()));
        apply(session);
        debug_assert!(session.successful_match_count <= session.search_count);
        session.clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, UserSession>> {
        // A panic inside `update` cannot leave a half-applied session: every
        // mutation is a plain field write, so the data is still consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date")
    }

    /// Clock that advances one day on every call.
    fn advancing_clock() -> SessionStore {
        let calls = AtomicU32::new(0);
        SessionStore::with_clock(move || date(1 + calls.fetch_add(1, Ordering::SeqCst)))
    }

    #[test]
    fn new_session_starts_at_zero() {
        let store = SessionStore::with_clock(|| date(5));
        let session = store.get_or_create(42);

        assert_eq!(session.search_count(), 0);
        assert_eq!(session.successful_match_count(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.joined(), date(5));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let store = advancing_clock();
        let first = store.get_or_create(7);
        store.record_match(7, HistoryEntry::new("Song", "Artist"));
        let second = store.get_or_create(7);

        assert_eq!(first.joined(), second.joined());
        assert_eq!(second.search_count(), 1);
        assert_eq!(second.successful_match_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sessions_are_independent_per_user() {
        let store = advancing_clock();
        store.record_match(1, HistoryEntry::new("A", "X"));
        let other = store.get_or_create(2);

        assert_eq!(other.search_count(), 0);
        assert!(other.history().is_empty());
        assert_ne!(store.get_or_create(1).joined(), other.joined());
    }

    #[test]
    fn record_search_only_counts_the_search() {
        let store = SessionStore::new();
        let session = store.record_search(1);

        assert_eq!(session.search_count(), 1);
        assert_eq!(session.successful_match_count(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn record_lyrics_result_counts_and_appends() {
        let store = SessionStore::new();
        let session = store.record_lyrics_result(1, HistoryEntry::new("We Will Rock You", "Queen"));

        assert_eq!(session.search_count(), 1);
        assert_eq!(session.successful_match_count(), 0);
        assert_eq!(
            session.history(),
            &[HistoryEntry::new("We Will Rock You", "Queen")]
        );
    }

    #[test]
    fn match_count_never_exceeds_search_count() {
        let store = SessionStore::new();
        // Deterministic mix of all three operations.
        for i in 0..60u32 {
            let session = match i % 5 {
                0 | 3 => store.record_match(9, HistoryEntry::new(format!("t{i}"), "a")),
                1 => store.record_search(9),
                2 => store.record_lyrics_result(9, HistoryEntry::new(format!("l{i}"), "b")),
                _ => store.get_or_create(9),
            };
            assert!(
                session.successful_match_count() <= session.search_count(),
                "invariant broken after step {i}: {session:?}"
            );
        }
    }

    #[test]
    fn recent_history_keeps_last_entries_in_order() {
        let store = SessionStore::new();
        for i in 0..13 {
            store.record_match(3, HistoryEntry::new(format!("song{i}"), "artist"));
        }
        let session = store.get_or_create(3);
        let recent = session.recent_history(10);

        assert_eq!(session.history().len(), 13);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].title, "song3");
        assert_eq!(recent[9].title, "song12");
    }

    #[test]
    fn recent_history_shorter_than_limit() {
        let store = SessionStore::new();
        store.record_match(3, HistoryEntry::new("only", "one"));
        assert_eq!(store.get_or_create(3).recent_history(10).len(), 1);
    }

    #[test]
    fn success_rate_handles_zero_searches() {
        let store = SessionStore::new();
        assert_eq!(store.get_or_create(1).success_rate(), 0.0);

        store.record_match(1, HistoryEntry::new("a", "b"));
        store.record_search(1);
        let rate = store.get_or_create(1).success_rate();
        assert!((rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clones_share_sessions() {
        let store = SessionStore::new();
        let clone = store.clone();
        clone.record_search(5);
        assert_eq!(store.get_or_create(5).search_count(), 1);
    }

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SessionStore>();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_preserve_invariant() {
        let store = SessionStore::new();
        let mut tasks = Vec::new();
        for t in 0..8u32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..50u32 {
                    if (t + i) % 2 == 0 {
                        store.record_match(1, HistoryEntry::new("x", "y"));
                    } else {
                        store.record_search(1);
                    }
                }
            }));
        }
        for task in tasks {
            task.await.expect("task panicked");
        }

        let session = store.get_or_create(1);
        assert_eq!(session.search_count(), 400);
        assert_eq!(session.successful_match_count(), 200);
        assert_eq!(session.history().len(), 200);
    }
}
