/**
 * Edit Operations
 *
 * This module defines the edit operation types recorded in a session's
 * operation log. Operations are immutable once appended: the log only ever
 * appends new entries or evicts the oldest one when the history cap is hit.
 *
 * Each operation kind has two application paths with intentionally different
 * semantics:
 *
 * - **Live apply** is used when an edit is made against the current text
 *   (fresh edits, redo). Inserts splice, deletes remove the recorded
 *   payload, replaces overwrite.
 * - **Replay apply** is used when rebuilding text from the original
 *   (undo, restore-to-version). Inserts splice, deletes are a no-op, and a
 *   replace overwrites the whole document with its payload.
 *
 * The delete divergence is a load-bearing contract: changing it would alter
 * the observable output of undo and restore. Keep both paths side by side.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of edit recorded in the operation log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Insert text at a position
    Insert,
    /// Delete a run of text starting at a position
    Delete,
    /// Replace text; logged replaces carry only the new text
    Replace,
}

/// Who produced an edit
///
/// Provenance is display/audit metadata only and never affects how an
/// operation is applied or replayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationSource {
    /// A human editing the draft directly
    #[default]
    User,
    /// The rewriting agent (e.g. an LLM pass over dictated text)
    Agent,
}

/// One immutable entry in a session's operation log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditOperation {
    /// Unique operation ID, assigned at creation
    pub id: Uuid,
    /// Kind of edit
    pub kind: EditKind,
    /// Byte offset into the text at the time of the live edit
    pub position: usize,
    /// Payload; meaning depends on `kind`:
    /// inserted text, deleted text (the exact substring removed), or the
    /// replacement text
    pub payload: String,
    /// Creation time; non-decreasing within a log
    pub timestamp: DateTime<Utc>,
    /// Provenance tag
    pub source: OperationSource,
}

impl EditOperation {
    fn new(kind: EditKind, position: usize, payload: String, source: OperationSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            payload,
            timestamp: Utc::now(),
            source,
        }
    }

    /// Create an insert operation
    pub fn insert(position: usize, text: impl Into<String>, source: OperationSource) -> Self {
        Self::new(EditKind::Insert, position, text.into(), source)
    }

    /// Create a delete operation
    ///
    /// `removed` must be the exact substring taken out of the text, so the
    /// operation stays invertible by later consumers.
    pub fn delete(position: usize, removed: impl Into<String>, source: OperationSource) -> Self {
        Self::new(EditKind::Delete, position, removed.into(), source)
    }

    /// Create a replace operation
    ///
    /// Only the start position and the new text are retained; the end of the
    /// replaced range is not part of the record.
    pub fn replace(position: usize, text: impl Into<String>, source: OperationSource) -> Self {
        Self::new(EditKind::Replace, position, text.into(), source)
    }

    /// Apply this logged operation against the current text (live semantics).
    ///
    /// Used by redo, where the current text is already consistent with the
    /// log position just before this operation. Total function: positions
    /// are clamped to the nearest char boundary at or before the end of the
    /// text, so a drifted historical position can never panic.
    ///
    /// A logged `Replace` has no end bound, so it is applied as a
    /// whole-document overwrite, same as in replay.
    pub fn apply_live(&self, text: &str) -> String {
        match self.kind {
            EditKind::Insert => splice(text, self.position, &self.payload),
            EditKind::Delete => {
                let start = clamp_boundary(text, self.position);
                let end = clamp_boundary(text, start.saturating_add(self.payload.len()));
                let mut out = String::with_capacity(text.len().saturating_sub(end - start));
                out.push_str(&text[..start]);
                out.push_str(&text[end..]);
                out
            }
            EditKind::Replace => self.payload.clone(),
        }
    }

    /// Apply this operation during replay-from-scratch.
    ///
    /// Inserts splice as in live apply. Deletes are a no-op. A replace
    /// overwrites the entire document with its payload, ignoring position.
    pub fn apply_replay(&self, text: &str) -> String {
        match self.kind {
            EditKind::Insert => splice(text, self.position, &self.payload),
            EditKind::Delete => text.to_string(),
            EditKind::Replace => self.payload.clone(),
        }
    }
}

/// Insert `payload` into `text` at `position`, clamping to a valid boundary.
fn splice(text: &str, position: usize, payload: &str) -> String {
    let at = clamp_boundary(text, position);
    let mut out = String::with_capacity(text.len() + payload.len());
    out.push_str(&text[..at]);
    out.push_str(payload);
    out.push_str(&text[at..]);
    out
}

/// Largest char boundary at or before `position` (capped at `text.len()`).
pub(crate) fn clamp_boundary(text: &str, position: usize) -> usize {
    let mut at = position.min(text.len());
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}
