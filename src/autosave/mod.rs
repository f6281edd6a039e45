/**
 * Auto-save Scheduler
 *
 * Debounced persistence for editing sessions. Every mutation marks its
 * session dirty and (re)arms a per-session timer; rapid edits coalesce into
 * a single save at the tail of the burst instead of one save per keystroke.
 *
 * The timer task re-reads the session's dirty flag and current text when it
 * fires, never a snapshot captured at arm time. Failures keep the session
 * dirty for a later retry, are logged, and are reported through an optional
 * error handler rather than escaping the timer context. Manual saves bypass
 * the debounce and hand failures straight back to the caller.
 *
 * Pending timers are cancellable per session (and cancelled when the owning
 * session is deleted); a save already in flight is never aborted, and its
 * result still lands in the save state when it completes.
 */
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::engine::{EngineError, EngineResult};
use crate::store::SessionStore;

/// External persistence capability for drafts.
///
/// Implemented by the surrounding system (publishing-platform drafts, a
/// database row, a file). The engine only requires that the current text can
/// be stored under the session ID.
pub trait DraftPersistence: Send + Sync {
    /// Persist `text` as the current draft of `session_id`.
    fn save(&self, session_id: Uuid, text: String) -> BoxFuture<'static, EngineResult<()>>;
}

/// Callback invoked when a background (debounced) save fails.
pub type SaveErrorHandler = Arc<dyn Fn(Uuid, &EngineError) + Send + Sync>;

/// Persistence bookkeeping for one session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SaveState {
    /// Session has edits not yet persisted
    pub dirty: bool,
    /// A save is currently in flight
    pub is_saving: bool,
    /// When the last successful save completed
    pub last_saved_at: Option<DateTime<Utc>>,
}

/// Owned, cancellable debounce timers, one per session.
///
/// Dropping the arena aborts every pending timer so a long-running process
/// cannot leak them.
#[derive(Default)]
struct TimerArena {
    timers: HashMap<Uuid, JoinHandle<()>>,
}

impl TimerArena {
    /// Replace the session's pending timer, aborting the previous one.
    fn arm(&mut self, id: Uuid, handle: JoinHandle<()>) {
        if let Some(old) = self.timers.insert(id, handle) {
            old.abort();
        }
    }

    fn cancel(&mut self, id: Uuid) {
        if let Some(handle) = self.timers.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TimerArena {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

/// Debounced auto-save driver shared by all sessions of a manager
#[derive(Clone)]
pub struct AutosaveScheduler {
    interval: Duration,
    store: SessionStore,
    persistence: Arc<dyn DraftPersistence>,
    states: Arc<Mutex<HashMap<Uuid, SaveState>>>,
    timers: Arc<Mutex<TimerArena>>,
    on_error: Option<SaveErrorHandler>,
}

impl AutosaveScheduler {
    /// Create a scheduler over `store`, saving through `persistence` after
    /// `interval` of edit silence.
    pub fn new(store: SessionStore, persistence: Arc<dyn DraftPersistence>, interval: Duration) -> Self {
        Self {
            interval,
            store,
            persistence,
            states: Arc::new(Mutex::new(HashMap::new())),
            timers: Arc::new(Mutex::new(TimerArena::default())),
            on_error: None,
        }
    }

    /// Register a handler for background save failures.
    pub fn with_error_handler(mut self, handler: SaveErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    /// Note a mutation on `session_id` and (re)arm its debounce timer.
    ///
    /// Any previously pending timer for the session is cancelled, so a burst
    /// of edits produces a single save once the burst goes quiet.
    pub fn mark_dirty(&self, session_id: Uuid) {
        {
            let mut states = self.states.lock().unwrap();
            states.entry(session_id).or_default().dirty = true;
        }

        let this = self.clone();
        // Fix the debounce deadline at arm time, not at the spawned task's
        // first poll, so the window starts with the mutation itself.
        let debounce = tokio::time::sleep(self.interval);
        let handle = tokio::spawn(async move {
            debounce.await;
            // Detach the actual save so a re-arm can cancel the debounce but
            // never a save already in flight.
            let worker = this.clone();
            tokio::spawn(async move {
                if let Err(err) = worker.flush(session_id).await {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %err,
                        "auto-save failed, session stays dirty"
                    );
                    if let Some(on_error) = &worker.on_error {
                        on_error(session_id, &err);
                    }
                }
            });
        });
        self.timers.lock().unwrap().arm(session_id, handle);
    }

    /// Save immediately, bypassing the debounce.
    ///
    /// No-op when the session is already clean. Persistence failures are
    /// propagated to the caller; the session stays dirty.
    pub async fn save_now(&self, session_id: Uuid) -> EngineResult<()> {
        self.timers.lock().unwrap().cancel(session_id);
        self.flush(session_id).await
    }

    /// Cancel any pending timer for the session.
    pub fn cancel(&self, session_id: Uuid) {
        self.timers.lock().unwrap().cancel(session_id);
    }

    /// Drop all bookkeeping for a deleted session.
    pub fn forget(&self, session_id: Uuid) {
        self.cancel(session_id);
        self.states.lock().unwrap().remove(&session_id);
    }

    /// Current save bookkeeping for the session (clean default if unknown).
    pub fn save_state(&self, session_id: Uuid) -> SaveState {
        self.states
            .lock()
            .unwrap()
            .get(&session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Persist the session if it is dirty, re-reading state at call time.
    async fn flush(&self, session_id: Uuid) -> EngineResult<()> {
        let dirty = self
            .states
            .lock()
            .unwrap()
            .get(&session_id)
            .map(|s| s.dirty)
            .unwrap_or(false);
        if !dirty {
            return Ok(());
        }

        let Some(text) = self.store.current_text(session_id).await else {
            // Session deleted while the timer was pending.
            self.states.lock().unwrap().remove(&session_id);
            return Ok(());
        };

        {
            let mut states = self.states.lock().unwrap();
            states.entry(session_id).or_default().is_saving = true;
        }

        let result = self.persistence.save(session_id, text).await;

        let mut states = self.states.lock().unwrap();
        let state = states.entry(session_id).or_default();
        state.is_saving = false;
        match result {
            Ok(()) => {
                state.dirty = false;
                state.last_saved_at = Some(Utc::now());
                tracing::debug!(session_id = %session_id, "draft saved");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for AutosaveScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutosaveScheduler")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
