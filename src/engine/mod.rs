//! Editing Engine
//!
//! Core of the drafting pipeline: operation records, the capped operation
//! log, the replay engine, and the per-document session aggregate.
//!
//! # Overview
//!
//! A document under edit is modeled as an immutable original text plus an
//! append-only log of edit operations. The text at any point in history is
//! derived, not stored: undo and restore replay a log prefix over the
//! original, while fresh edits and redo apply live semantics against the
//! cached current text. The two application paths intentionally diverge for
//! deletes and replaces; see [`operation`] for the contract.

/// Edit operation records and single-operation application
pub mod operation;

/// Append-only capped log with undo/redo cursor
pub mod oplog;

/// Replay-from-scratch text reconstruction
pub mod replay;

/// Session aggregate: mutations, undo/redo, restore
pub mod session;

/// Engine error taxonomy
pub mod error;

/// Re-export commonly used types for convenience
pub use error::{EngineError, EngineResult};
pub use operation::{EditKind, EditOperation, OperationSource};
pub use oplog::{OperationLog, DEFAULT_MAX_HISTORY};
pub use replay::replay;
pub use session::{EditingSession, SessionStatus};
