//! Shopping Cart State Management
//!
//! This module manages the application state: the catalog every session
//! shops from and the per-session checkout and chat state.

use super::checkout::Checkout;
use crate::catalog::Catalog;
use crate::chat::{ChatSettings, ChatWidget};
use dashmap::{mapref::one::RefMut, DashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::{task::JoinHandle, time::Instant};

/// Sessions untouched for this long are dropped by the sweeper
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Everything one browser session owns
pub struct Session {
    pub checkout: Checkout,
    pub chat: ChatWidget,
    /// Refreshed every time the session is looked up
    last_seen: Instant,
}

impl Session {
    pub fn new(catalog: &Catalog, chat: ChatSettings) -> Self {
        Self {
            checkout: Checkout::new(catalog),
            chat: ChatWidget::new(chat),
            last_seen: Instant::now(),
        }
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

/// Core application state containing the catalog and live sessions
pub struct AppState {
    /// In-memory storage for sessions, keyed by session id.
    /// DashMap allows concurrent access without external Mutexes.
    pub sessions: DashMap<String, Session>,

    /// Seed data shared by all sessions
    pub catalog: Catalog,

    /// Settings handed to each new chat widget
    pub chat_settings: ChatSettings,

    /// Inactivity after which a session is forgotten
    pub session_idle_timeout: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ChatSettings::default())
    }
}

impl AppState {
    /// Creates an AppState with the seeded catalog and no sessions
    pub fn new(chat_settings: ChatSettings) -> Self {
        Self::with_catalog(Catalog::seed(), chat_settings)
    }

    pub fn with_catalog(catalog: Catalog, chat_settings: ChatSettings) -> Self {
        Self {
            sessions: DashMap::new(),
            catalog,
            chat_settings,
            session_idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.session_idle_timeout = timeout;
        self
    }

    /// Returns the session for `session_id`, creating it on first use.
    ///
    /// The returned guard locks the session's shard; do not hold it across
    /// an `.await`.
    pub fn session(&self, session_id: &str) -> RefMut<'_, String, Session> {
        let mut session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(&self.catalog, self.chat_settings));
        session.last_seen = Instant::now();
        session
    }

    /// Drops a session together with its chat widget. Returns whether the
    /// session existed.
    pub fn end_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Drops every session idle for at least `session_idle_timeout`,
    /// cancelling their pending chat replies. Returns how many were dropped.
    pub fn purge_idle_sessions(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.idle_for() < self.session_idle_timeout);
        before.saturating_sub(self.sessions.len())
    }
}

/// Periodically purges idle sessions until the state is dropped.
///
/// `every` must be non-zero.
pub fn spawn_session_sweeper(state: &SharedState, every: Duration) -> JoinHandle<()> {
    let state = Arc::downgrade(state);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let Some(state) = state.upgrade() else {
                break;
            };
            let expired = state.purge_idle_sessions();
            if expired > 0 {
                tracing::info!(expired, remaining = state.sessions.len(), "Idle sessions expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_purged() {
        let state = AppState::default().with_session_idle_timeout(Duration::from_secs(60));
        drop(state.session("stale"));
        drop(state.session("busy"));

        tokio::time::advance(Duration::from_secs(45)).await;
        drop(state.session("busy"));
        drop(state.session("fresh"));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(state.purge_idle_sessions(), 1);
        assert!(!state.sessions.contains_key("stale"));
        assert!(state.sessions.contains_key("busy"));
        assert!(state.sessions.contains_key("fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_expires_sessions_and_stops_with_state() {
        let state = Arc::new(AppState::default().with_session_idle_timeout(Duration::from_secs(60)));
        let sweeper = spawn_session_sweeper(&state, Duration::from_secs(10));
        drop(state.session("idle"));

        tokio::time::sleep(Duration::from_secs(75)).await;
        assert!(state.sessions.is_empty());

        drop(state);
        sweeper.await.unwrap();
    }
}
