//! Per-session page state.
//!
//! Each session owns a [`SessionState`] of `(page, show_map)`. It starts at
//! `(Home, false)` and only changes through [`Action`]s; there is no terminal
//! state.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Home,
    Dashboard,
    PredictionModel,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Dashboard => "Dashboard",
            Page::PredictionModel => "Prediction Model",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Navigate { page: Page },
    ShowMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub page: Page,
    pub show_map: bool,
}

impl SessionState {
    /// Navigation is unguarded and leaves `show_map` alone.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Navigate { page } => self.page = page,
            Action::ShowMap => self.show_map = true,
        }
    }
}

pub type SessionId = String;

#[derive(Debug)]
struct Entry {
    state: SessionState,
    last_seen: Instant,
}

/// Sessions idle for longer than `ttl` are treated as gone and dropped on
/// the next `create`. Without a ttl they live until removed.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::default(),
            ttl: Some(ttl),
        }
    }

    fn expired(&self, entry: &Entry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(entry.last_seen) > ttl)
    }

    pub fn create(&self) -> (SessionId, SessionState) {
        self.purge_idle();
        let state = SessionState::default();
        let mut sessions = self.sessions.write();
        let id = loop {
            let candidate = format!("{:016x}", rand::random::<u64>());
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(
            id.clone(),
            Entry {
                state,
                last_seen: Instant::now(),
            },
        );
        (id, state)
    }

    pub fn get(&self, id: &str) -> Option<SessionState> {
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(id)?;
        if self.expired(entry, now) {
            sessions.remove(id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.state)
    }

    /// Applies `action` and returns the resulting state, or `None` for an
    /// unknown or expired session.
    pub fn apply(&self, id: &str, action: Action) -> Option<SessionState> {
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(id)?;
        if self.expired(entry, now) {
            sessions.remove(id);
            return None;
        }
        entry.state.apply(action);
        entry.last_seen = now;
        Some(entry.state)
    }

    pub fn remove(&self, id: &str) -> Option<SessionState> {
        self.sessions.write().remove(id).map(|entry| entry.state)
    }

    /// Drops every idle session and returns how many went.
    pub fn purge_idle(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| !self.expired(entry, now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!("purged {} idle sessions", purged);
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
