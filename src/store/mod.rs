/**
 * Session Store
 *
 * Thread-safe map from session ID to editing session, shared between the
 * lifecycle manager and the auto-save scheduler. The store is an explicit
 * object handed to its consumers rather than a module-level singleton, so
 * tests can run against isolated stores.
 *
 * Each session's log is owned exclusively by that session; the store's lock
 * only serializes map access and per-session mutation.
 */
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::engine::{EditingSession, EngineError, EngineResult};

/// Shared map of live editing sessions
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, EditingSession>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a session.
    pub async fn insert(&self, session: EditingSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session);
    }

    /// Snapshot of a session by ID.
    pub async fn get(&self, id: Uuid) -> Option<EditingSession> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).cloned()
    }

    /// Current derived text of a session, if it still exists.
    ///
    /// Used by the auto-save scheduler at timer-fire time so it saves the
    /// text as of now, never a captured snapshot.
    pub async fn current_text(&self, id: Uuid) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(|s| s.current_text().to_string())
    }

    /// Run a mutation against a session under the write lock.
    ///
    /// Fails with `SessionNotFound` when the ID is unknown; otherwise the
    /// closure's result is handed back unchanged.
    pub async fn with_session_mut<T, F>(&self, id: Uuid, f: F) -> EngineResult<T>
    where
        F: FnOnce(&mut EditingSession) -> EngineResult<T>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| EngineError::session_not_found(id))?;
        f(session)
    }

    /// Remove a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&id).is_some()
    }

    /// IDs of all live sessions.
    pub async fn ids(&self) -> Vec<Uuid> {
        let sessions = self.sessions.read().await;
        sessions.keys().copied().collect()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
