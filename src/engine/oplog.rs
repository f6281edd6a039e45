//! Operation Log
//!
//! Append-only, truncatable sequence of edit operations with a cursor that
//! marks how many operations are currently applied. The cursor separates
//! undo-able history (at or before it) from the redo-able future (after it).
//!
//! Retention is bounded: once the log exceeds its cap, the oldest entry is
//! evicted from the front and the cursor shifts with it. Eviction silently
//! truncates reconstructible history — the original text alone no longer
//! rebuilds states older than the cap. That is an accepted bounded-memory
//! trade-off.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::operation::EditOperation;

/// Default retention bound for a session's operation log.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Ordered log of edit operations plus the applied-up-to cursor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationLog {
    entries: Vec<EditOperation>,
    /// Index of the last applied operation; `-1` means none applied.
    cursor: isize,
    max_history: usize,
}

impl OperationLog {
    /// Create an empty log with the given retention bound.
    pub fn new(max_history: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
            max_history,
        }
    }

    /// Append a fresh operation.
    ///
    /// Any entries after the cursor are discarded first: a new edit made
    /// after an undo invalidates the redo tail, exactly as in a linear undo
    /// stack. The cursor then points at the appended entry. If the log
    /// outgrows its cap the oldest entry is evicted and the cursor shifts
    /// down so it still names the same logical operation.
    ///
    /// Timestamps are kept non-decreasing within the log.
    pub fn append(&mut self, mut op: EditOperation) -> &EditOperation {
        let keep = (self.cursor + 1) as usize;
        if keep < self.entries.len() {
            self.entries.truncate(keep);
        }

        if let Some(last) = self.entries.last() {
            if op.timestamp < last.timestamp {
                op.timestamp = last.timestamp;
            }
        }

        self.entries.push(op);
        self.cursor = self.entries.len() as isize - 1;

        if self.entries.len() > self.max_history {
            self.entries.remove(0);
            self.cursor -= 1;
        }

        // cursor is always the last index here
        &self.entries[self.cursor as usize]
    }

    /// Move the cursor without discarding entries.
    ///
    /// Used by undo/redo/restore; entries past the cursor stay reachable for
    /// redo until the next `append` invalidates them. `index` must be within
    /// `-1..entries.len()`.
    pub fn set_cursor(&mut self, index: isize) {
        debug_assert!(index >= -1 && index < self.entries.len() as isize);
        self.cursor = index.clamp(-1, self.entries.len() as isize - 1);
    }

    /// Current cursor position (`-1` when no operations are applied).
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[EditOperation] {
        &self.entries
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry with the given operation ID, if present.
    pub fn index_of(&self, op_id: Uuid) -> Option<usize> {
        self.entries.iter().position(|op| op.id == op_id)
    }

    /// Whether there is anything to undo (at least one applied operation).
    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    /// Whether there is a redo tail past the cursor.
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len() as isize - 1
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::operation::OperationSource;

    fn op(n: usize) -> EditOperation {
        EditOperation::insert(0, format!("op{}", n), OperationSource::User)
    }

    #[test]
    fn test_append_advances_cursor() {
        let mut log = OperationLog::default();
        assert_eq!(log.cursor(), -1);
        log.append(op(1));
        assert_eq!(log.cursor(), 0);
        log.append(op(2));
        assert_eq!(log.cursor(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_append_discards_redo_tail() {
        let mut log = OperationLog::default();
        log.append(op(1));
        log.append(op(2));
        log.append(op(3));
        log.set_cursor(0);
        assert!(log.can_redo());

        let id = log.append(op(4)).id;
        assert_eq!(log.len(), 2);
        assert_eq!(log.cursor(), 1);
        assert!(!log.can_redo());
        assert_eq!(log.entries()[1].id, id);
    }

    #[test]
    fn test_eviction_at_cap_keeps_cursor_valid() {
        let mut log = OperationLog::new(2);
        log.append(op(1));
        log.append(op(2));
        let third = log.append(op(3)).id;
        assert_eq!(log.len(), 2);
        assert_eq!(log.cursor(), 1);
        assert_eq!(log.entries()[0].payload, "op2");
        assert_eq!(log.entries()[1].id, third);
    }

    #[test]
    fn test_undo_from_cursor_zero_reaches_original() {
        let mut log = OperationLog::default();
        log.append(op(1));
        assert!(log.can_undo());
        log.set_cursor(-1);
        assert!(!log.can_undo());
        assert!(log.can_redo());
    }

    #[test]
    fn test_index_of() {
        let mut log = OperationLog::default();
        let id = log.append(op(1)).id;
        log.append(op(2));
        assert_eq!(log.index_of(id), Some(0));
        assert_eq!(log.index_of(Uuid::new_v4()), None);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut log = OperationLog::default();
        let mut backdated = op(1);
        log.append(op(0));
        backdated.timestamp = chrono::DateTime::<chrono::Utc>::MIN_UTC;
        log.append(backdated);
        let entries = log.entries();
        assert!(entries[1].timestamp >= entries[0].timestamp);
    }
}
