/**
 * Session Lifecycle Manager
 *
 * The engine's external interface. Owns the session store and the auto-save
 * scheduler, and exposes the operations the surrounding system calls: open
 * and delete sessions, apply edits, undo/redo/restore, read history, toggle
 * completion, and save on demand.
 *
 * Every successful mutation marks the session dirty so the scheduler can
 * debounce a save behind it. Log and replay work is synchronous; the only
 * awaits here are the store lock and the persistence capability.
 */
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::autosave::{AutosaveScheduler, DraftPersistence, SaveErrorHandler, SaveState};
use crate::config::EngineConfig;
use crate::engine::{
    EditOperation, EditingSession, EngineError, EngineResult, OperationSource,
};
use crate::store::SessionStore;

/// Result of an undo or redo step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the step changed anything (false = nothing to undo/redo)
    pub applied: bool,
    /// Current text after the step
    pub text: String,
}

/// Facade over the session store, engine, and auto-save scheduler
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: SessionStore,
    scheduler: AutosaveScheduler,
    config: EngineConfig,
}

impl SessionManager {
    /// Create a manager over an explicit store and persistence capability.
    ///
    /// The store is injected so callers (and tests) control sharing and
    /// isolation; nothing here is process-global.
    pub fn new(
        store: SessionStore,
        persistence: Arc<dyn DraftPersistence>,
        config: EngineConfig,
    ) -> Self {
        let scheduler =
            AutosaveScheduler::new(store.clone(), persistence, config.autosave_interval);
        Self {
            store,
            scheduler,
            config,
        }
    }

    /// Create a manager with default configuration and a fresh store.
    pub fn with_defaults(persistence: Arc<dyn DraftPersistence>) -> Self {
        Self::new(SessionStore::new(), persistence, EngineConfig::default())
    }

    /// Register a handler for background auto-save failures.
    pub fn on_save_error(mut self, handler: SaveErrorHandler) -> Self {
        self.scheduler = self.scheduler.with_error_handler(handler);
        self
    }

    /// Open a new session over `initial_text` for `owner_id`.
    pub async fn create_session(
        &self,
        owner_id: impl Into<String>,
        initial_text: impl Into<String>,
    ) -> EditingSession {
        let session = EditingSession::new(owner_id, initial_text, self.config.max_history_size);
        tracing::info!(session_id = %session.id, owner_id = %session.owner_id, "session created");
        let snapshot = session.clone();
        self.store.insert(session).await;
        snapshot
    }

    /// Insert `text` at `position` in the session's current text.
    pub async fn apply_insert(
        &self,
        session_id: Uuid,
        position: usize,
        text: &str,
    ) -> EngineResult<EditOperation> {
        let op = self
            .store
            .with_session_mut(session_id, |s| s.apply_insert(position, text))
            .await?;
        self.scheduler.mark_dirty(session_id);
        Ok(op)
    }

    /// Delete the `start..end` range from the session's current text.
    pub async fn apply_delete(
        &self,
        session_id: Uuid,
        start: usize,
        end: usize,
    ) -> EngineResult<EditOperation> {
        let op = self
            .store
            .with_session_mut(session_id, |s| s.apply_delete(start, end))
            .await?;
        self.scheduler.mark_dirty(session_id);
        Ok(op)
    }

    /// Replace the `start..end` range with `text`.
    pub async fn apply_replace(
        &self,
        session_id: Uuid,
        start: usize,
        end: usize,
        text: &str,
        source: OperationSource,
    ) -> EngineResult<EditOperation> {
        let op = self
            .store
            .with_session_mut(session_id, |s| s.apply_replace(start, end, text, source))
            .await?;
        self.scheduler.mark_dirty(session_id);
        Ok(op)
    }

    /// Overwrite the whole document, e.g. with an agent rewrite.
    pub async fn set_content(
        &self,
        session_id: Uuid,
        text: &str,
        source: OperationSource,
    ) -> EngineResult<EditOperation> {
        let op = self
            .store
            .with_session_mut(session_id, |s| Ok(s.set_content(text, source)))
            .await?;
        self.scheduler.mark_dirty(session_id);
        Ok(op)
    }

    /// Step the session one operation back.
    pub async fn undo(&self, session_id: Uuid) -> EngineResult<StepOutcome> {
        let outcome = self
            .store
            .with_session_mut(session_id, |s| {
                Ok(StepOutcome {
                    applied: s.undo(),
                    text: s.current_text().to_string(),
                })
            })
            .await?;
        if outcome.applied {
            self.scheduler.mark_dirty(session_id);
        }
        Ok(outcome)
    }

    /// Step the session one operation forward.
    pub async fn redo(&self, session_id: Uuid) -> EngineResult<StepOutcome> {
        let outcome = self
            .store
            .with_session_mut(session_id, |s| {
                Ok(StepOutcome {
                    applied: s.redo(),
                    text: s.current_text().to_string(),
                })
            })
            .await?;
        if outcome.applied {
            self.scheduler.mark_dirty(session_id);
        }
        Ok(outcome)
    }

    /// Restore the session to the state as of the given operation.
    pub async fn restore_to_operation(
        &self,
        session_id: Uuid,
        operation_id: Uuid,
    ) -> EngineResult<String> {
        let text = self
            .store
            .with_session_mut(session_id, |s| {
                s.restore_to_operation(operation_id).map(|t| t.to_string())
            })
            .await?;
        self.scheduler.mark_dirty(session_id);
        tracing::info!(session_id = %session_id, operation_id = %operation_id, "session restored");
        Ok(text)
    }

    /// The session's operation log in append order.
    pub async fn history(&self, session_id: Uuid) -> EngineResult<Vec<EditOperation>> {
        let session = self.get_session(session_id).await?;
        Ok(session.history().to_vec())
    }

    /// Snapshot of the session.
    pub async fn get_session(&self, session_id: Uuid) -> EngineResult<EditingSession> {
        self.store
            .get(session_id)
            .await
            .ok_or_else(|| EngineError::session_not_found(session_id))
    }

    /// Mark the session's draft as finished.
    pub async fn mark_completed(&self, session_id: Uuid) -> EngineResult<()> {
        self.store
            .with_session_mut(session_id, |s| {
                s.mark_completed();
                Ok(())
            })
            .await
    }

    /// Reopen a finished draft.
    pub async fn mark_incomplete(&self, session_id: Uuid) -> EngineResult<()> {
        self.store
            .with_session_mut(session_id, |s| {
                s.mark_incomplete();
                Ok(())
            })
            .await
    }

    /// Save the session immediately, bypassing the debounce.
    pub async fn save_now(&self, session_id: Uuid) -> EngineResult<()> {
        if self.store.get(session_id).await.is_none() {
            return Err(EngineError::session_not_found(session_id));
        }
        self.scheduler.save_now(session_id).await
    }

    /// Current save bookkeeping for the session.
    pub fn save_state(&self, session_id: Uuid) -> SaveState {
        self.scheduler.save_state(session_id)
    }

    /// Delete the session, cancelling any pending auto-save timer.
    ///
    /// Returns whether a session existed under the ID.
    pub async fn delete_session(&self, session_id: Uuid) -> bool {
        self.scheduler.forget(session_id);
        let existed = self.store.remove(session_id).await;
        if existed {
            tracing::info!(session_id = %session_id, "session deleted");
        }
        existed
    }
}
