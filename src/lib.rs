//! Voxdraft - Editing Session & Operation-Log Engine
//!
//! Voxdraft is the in-process core of a voice-to-article writing assistant.
//! Dictated text arrives from a speech pipeline, gets rewritten by an agent,
//! and is hand-edited into a publishable draft; this crate is the part that
//! tracks the document while that happens.
//!
//! # Overview
//!
//! Each document under edit is an [`engine::EditingSession`]: an immutable
//! original text plus an append-only, capped log of edit operations and a
//! cursor marking how many of them are applied. Text at any point in history
//! is derived by replaying a log prefix, which is what drives undo, redo,
//! and restore-to-version. A debounced auto-save scheduler persists dirty
//! sessions through an injected [`autosave::DraftPersistence`] capability.
//!
//! Speech-to-text, LLM rewriting, publishing, authentication, and HTTP
//! routing are external collaborators: the engine only ever sees already
//! produced text via its mutation API, and only ever asks the outside world
//! to store text under a session ID.
//!
//! # Module Structure
//!
//! - **`engine`** - Operation records, the capped log, replay, and the
//!   session aggregate (undo/redo/restore live here)
//! - **`store`** - Shared session map, injected rather than global
//! - **`autosave`** - Debounced persistence scheduling per session
//! - **`manager`** - The external API surface tying the above together
//! - **`config`** - History cap and debounce interval
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voxdraft::{DraftPersistence, OperationSource, SessionManager};
//!
//! # async fn example(persistence: Arc<dyn DraftPersistence>) -> voxdraft::EngineResult<()> {
//! let manager = SessionManager::with_defaults(persistence);
//! let session = manager.create_session("author-42", "Hello").await;
//!
//! manager.apply_insert(session.id, 5, " world").await?;
//! manager.set_content(session.id, "Full rewrite", OperationSource::Agent).await?;
//!
//! let undone = manager.undo(session.id).await?;
//! assert_eq!(undone.text, "Hello world");
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Sessions are single-writer by contract. The store's `RwLock` serializes
//! map access; the auto-save timer is the only background activity and it
//! re-reads session state when it fires. There is no conflict resolution
//! for concurrent writers of one session.

/// Core editing engine: operations, log, replay, sessions
pub mod engine;

/// Shared session store
pub mod store;

/// Debounced auto-save scheduling
pub mod autosave;

/// Session lifecycle manager (external API)
pub mod manager;

/// Engine configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use autosave::{AutosaveScheduler, DraftPersistence, SaveErrorHandler, SaveState};
pub use config::{ConfigError, EngineConfig, EngineConfigBuilder};
pub use engine::{
    EditKind, EditOperation, EditingSession, EngineError, EngineResult, OperationLog,
    OperationSource, SessionStatus,
};
pub use manager::{SessionManager, StepOutcome};
pub use store::SessionStore;
