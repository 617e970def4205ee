//! In-memory session storage. Every session owns an independent
//! [`PickerSession`] behind its own async mutex; nothing outlives the process.

use std::{collections::HashMap, sync::Arc};

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use picker_core::PickerSession;
use shared::domain::SessionId;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

pub type SessionHandle = Arc<Mutex<PickerSession>>;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Clone)]
pub struct Storage {
    sessions: Arc<RwLock<HashMap<SessionId, StoredSession>>>,
    max_sessions: usize,
}

#[derive(Debug, Clone)]
struct StoredSession {
    handle: SessionHandle,
    created_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimes {
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl Storage {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
        }
    }

    pub async fn create_session(&self, session: PickerSession) -> Result<(SessionId, SessionHandle)> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            bail!(
                "session capacity reached ({} live sessions)",
                self.max_sessions
            );
        }

        let session_id = loop {
            let candidate = SessionId::new_v4();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let now = Utc::now();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(
            session_id,
            StoredSession {
                handle: handle.clone(),
                created_at: now,
                last_seen: now,
            },
        );
        debug!(%session_id, live = sessions.len(), "session created");
        Ok((session_id, handle))
    }

    /// Looks up a live session and marks it as recently used.
    pub async fn session(&self, session_id: SessionId) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&session_id)?;
        stored.last_seen = Utc::now();
        Some(stored.handle.clone())
    }

    pub async fn session_times(&self, session_id: SessionId) -> Option<SessionTimes> {
        let sessions = self.sessions.read().await;
        sessions.get(&session_id).map(|stored| SessionTimes {
            created_at: stored.created_at,
            last_seen: stored.last_seen,
        })
    }

    pub async fn end_session(&self, session_id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            debug!(%session_id, "session ended");
        }
        removed
    }

    /// Drops every session not seen within `ttl` of `now` and returns their ids.
    pub async fn evict_idle(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<SessionId> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, stored)| now - stored.last_seen > ttl)
            .map(|(session_id, _)| *session_id)
            .collect();
        for session_id in &expired {
            sessions.remove(session_id);
        }
        expired
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
