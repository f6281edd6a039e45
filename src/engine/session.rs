/**
 * Editing Session
 *
 * Aggregate root for one document under edit. A session owns the immutable
 * original text captured at creation, the operation log, and a cache of the
 * current derived text. Every mutation appends exactly one operation and
 * refreshes `updated_at`; undo/redo/restore move the log cursor and
 * recompute text without appending.
 *
 * Sessions are single-writer by contract: the store serializes access, and
 * no conflict resolution exists for overlapping writers.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{EngineError, EngineResult};
use super::operation::{EditOperation, OperationSource};
use super::oplog::OperationLog;
use super::replay::replay;

/// Whether the session is still being edited or has been finished
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Draft is open for edits
    #[default]
    Editing,
    /// Caller marked the draft as done (log is untouched by this)
    Completed,
}

/// One document under edit, with its full operation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditingSession {
    /// Unique session ID
    pub id: Uuid,
    /// Opaque identifier of the actor that opened the session
    pub owner_id: String,
    /// Text captured at creation; immutable for the session's lifetime
    original_text: String,
    /// Ordered, capped log of edits plus the applied-up-to cursor
    log: OperationLog,
    /// Cache of the text derived from the applied log prefix
    current_text: String,
    /// Editing/completed state
    pub status: SessionStatus,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl EditingSession {
    /// Open a session over `original_text` (possibly empty) with the given
    /// history cap.
    pub fn new(owner_id: impl Into<String>, original_text: impl Into<String>, max_history: usize) -> Self {
        let original_text = original_text.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            current_text: original_text.clone(),
            original_text,
            log: OperationLog::new(max_history),
            status: SessionStatus::Editing,
            created_at: now,
            updated_at: now,
        }
    }

    /// Text the session was opened with.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Current derived text (original text plus the applied log prefix).
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    /// Read-only view of the operation log in append order.
    pub fn history(&self) -> &[EditOperation] {
        self.log.entries()
    }

    /// Cursor into the log (`-1` when no operations are applied).
    pub fn cursor(&self) -> isize {
        self.log.cursor()
    }

    /// Whether undo would change anything.
    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    /// Whether redo would change anything.
    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Insert `text` at byte offset `position` in the current text.
    pub fn apply_insert(&mut self, position: usize, text: &str) -> EngineResult<EditOperation> {
        self.check_position(position)?;
        let op = EditOperation::insert(position, text, OperationSource::User);
        let next = op.apply_live(&self.current_text);
        Ok(self.commit(op, next))
    }

    /// Delete the `start..end` range from the current text.
    ///
    /// The removed substring is captured into the operation's payload so the
    /// record stays invertible.
    pub fn apply_delete(&mut self, start: usize, end: usize) -> EngineResult<EditOperation> {
        self.check_range(start, end)?;
        let removed = self.current_text[start..end].to_string();
        let op = EditOperation::delete(start, removed, OperationSource::User);
        let next = op.apply_live(&self.current_text);
        Ok(self.commit(op, next))
    }

    /// Replace the `start..end` range with `text`.
    ///
    /// The logged operation keeps only the start position and the new text;
    /// the end of the replaced range is not retained.
    pub fn apply_replace(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        source: OperationSource,
    ) -> EngineResult<EditOperation> {
        self.check_range(start, end)?;
        let mut next = String::with_capacity(self.current_text.len() - (end - start) + text.len());
        next.push_str(&self.current_text[..start]);
        next.push_str(text);
        next.push_str(&self.current_text[end..]);
        let op = EditOperation::replace(start, text, source);
        Ok(self.commit(op, next))
    }

    /// Overwrite the whole document with `text`.
    ///
    /// Logged as a single replace spanning the document, which is how agent
    /// rewrites land in the history.
    pub fn set_content(&mut self, text: &str, source: OperationSource) -> EditOperation {
        let op = EditOperation::replace(0, text, source);
        self.commit(op, text.to_string())
    }

    /// Step one operation back.
    ///
    /// Returns `false` without touching anything when there is nothing to
    /// undo. Undoing the first operation lands on the original text; other
    /// targets are rebuilt by replaying the log prefix from scratch.
    pub fn undo(&mut self) -> bool {
        if !self.log.can_undo() {
            return false;
        }
        let target = self.log.cursor() - 1;
        self.log.set_cursor(target);
        self.current_text = if target < 0 {
            self.original_text.clone()
        } else {
            replay(&self.original_text, self.log.entries(), target)
        };
        self.touch();
        tracing::debug!(session_id = %self.id, cursor = target, "undo");
        true
    }

    /// Step one operation forward.
    ///
    /// Returns `false` when there is no redo tail. Redo applies the single
    /// operation at the new cursor with live semantics against the current
    /// text, which is cheaper than a full replay and relies on the current
    /// text already matching the previous cursor.
    pub fn redo(&mut self) -> bool {
        if !self.log.can_redo() {
            return false;
        }
        let target = self.log.cursor() + 1;
        self.log.set_cursor(target);
        let op = &self.log.entries()[target as usize];
        self.current_text = op.apply_live(&self.current_text);
        self.touch();
        tracing::debug!(session_id = %self.id, cursor = target, "redo");
        true
    }

    /// Jump to the state as of the operation with the given ID.
    ///
    /// Same reconstruction as undo, generalized to an arbitrary target:
    /// the cursor moves to the operation's index and the text is rebuilt by
    /// replay-from-scratch over the prefix ending there.
    pub fn restore_to_operation(&mut self, op_id: Uuid) -> EngineResult<&str> {
        let index = self
            .log
            .index_of(op_id)
            .ok_or_else(|| EngineError::operation_not_found(op_id))?;
        self.log.set_cursor(index as isize);
        self.current_text = replay(&self.original_text, self.log.entries(), index as isize);
        self.touch();
        tracing::debug!(session_id = %self.id, operation_id = %op_id, cursor = index, "restore");
        Ok(&self.current_text)
    }

    /// Mark the draft as finished. The log is untouched.
    pub fn mark_completed(&mut self) {
        self.status = SessionStatus::Completed;
        self.touch();
    }

    /// Reopen a finished draft for editing.
    pub fn mark_incomplete(&mut self) {
        self.status = SessionStatus::Editing;
        self.touch();
    }

    fn commit(&mut self, op: EditOperation, next_text: String) -> EditOperation {
        let stored = self.log.append(op).clone();
        self.current_text = next_text;
        self.touch();
        stored
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn check_position(&self, position: usize) -> EngineResult<()> {
        let len = self.current_text.len();
        if position > len {
            return Err(EngineError::invalid_range(
                position,
                position,
                len,
                "position past end of text",
            ));
        }
        if !self.current_text.is_char_boundary(position) {
            return Err(EngineError::invalid_range(
                position,
                position,
                len,
                "position not on a char boundary",
            ));
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> EngineResult<()> {
        if start > end {
            return Err(EngineError::invalid_range(
                start,
                end,
                self.current_text.len(),
                "start exceeds end",
            ));
        }
        self.check_position(start)?;
        self.check_position(end)
    }
}
