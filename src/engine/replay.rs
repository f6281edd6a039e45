//! Replay / Reconstruction Engine
//!
//! Rebuilds document text at an arbitrary log index by folding replay
//! semantics over a log prefix, starting from the session's original text.
//! Replay is a pure function of `(original, ops, target_index)` and is what
//! undo and restore-to-version use.
//!
//! Replay semantics differ from live editing on purpose: deletes are a
//! no-op and replaces overwrite the whole document (see
//! [`EditOperation::apply_replay`]). Do not route live edits through here.

use super::operation::EditOperation;

/// Replay `ops[0..=target_index]` over `original`.
///
/// A `target_index` of `-1` yields `original` unchanged. Indices past the
/// end of the slice replay the whole slice.
pub fn replay(original: &str, ops: &[EditOperation], target_index: isize) -> String {
    if target_index < 0 || ops.is_empty() {
        return original.to_string();
    }
    let end = (target_index as usize).min(ops.len() - 1);
    let mut text = original.to_string();
    for op in &ops[..=end] {
        text = op.apply_replay(&text);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::operation::OperationSource;

    #[test]
    fn test_negative_target_yields_original() {
        let ops = vec![EditOperation::insert(0, "x", OperationSource::User)];
        assert_eq!(replay("orig", &ops, -1), "orig");
    }

    #[test]
    fn test_replay_insert_chain() {
        let ops = vec![
            EditOperation::insert(5, " world", OperationSource::User),
            EditOperation::insert(11, "!", OperationSource::User),
        ];
        assert_eq!(replay("Hello", &ops, 0), "Hello world");
        assert_eq!(replay("Hello", &ops, 1), "Hello world!");
    }

    #[test]
    fn test_replay_skips_deletes() {
        let ops = vec![EditOperation::delete(1, "bc", OperationSource::User)];
        assert_eq!(replay("abcdef", &ops, 0), "abcdef");
    }

    #[test]
    fn test_replay_ending_in_replace_is_snapshot() {
        let ops = vec![
            EditOperation::insert(0, "garbage ", OperationSource::User),
            EditOperation::replace(0, "Full rewrite", OperationSource::Agent),
        ];
        assert_eq!(replay("anything", &ops, 1), "Full rewrite");
    }

    #[test]
    fn test_replay_is_deterministic() {
        let ops = vec![
            EditOperation::insert(0, "a", OperationSource::User),
            EditOperation::delete(0, "a", OperationSource::User),
            EditOperation::insert(1, "b", OperationSource::Agent),
        ];
        let first = replay("seed", &ops, 2);
        let second = replay("seed", &ops, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_target_past_end_replays_everything() {
        let ops = vec![EditOperation::insert(0, "x", OperationSource::User)];
        assert_eq!(replay("y", &ops, 99), "xy");
    }
}
