//! Property-based tests for the operation log and replay engine.

use proptest::prelude::*;
use voxdraft::engine::{replay, EditOperation, EditingSession, OperationSource};

/// Arbitrary ASCII text keeps generated positions on char boundaries.
fn ascii_text() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

fn arb_op() -> impl Strategy<Value = EditOperation> {
    prop_oneof![
        (0usize..64, ascii_text())
            .prop_map(|(pos, text)| EditOperation::insert(pos, text, OperationSource::User)),
        (0usize..64, ascii_text())
            .prop_map(|(pos, text)| EditOperation::delete(pos, text, OperationSource::User)),
        (0usize..64, ascii_text())
            .prop_map(|(pos, text)| EditOperation::replace(pos, text, OperationSource::Agent)),
    ]
}

proptest! {
    #[test]
    fn replay_is_deterministic(
        original in ascii_text(),
        ops in prop::collection::vec(arb_op(), 0..20),
        target in -1isize..20,
    ) {
        let first = replay(&original, &ops, target);
        let second = replay(&original, &ops, target);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn replay_of_empty_prefix_is_original(original in ascii_text(), ops in prop::collection::vec(arb_op(), 0..10)) {
        prop_assert_eq!(replay(&original, &ops, -1), original);
    }

    #[test]
    fn delete_never_changes_replayed_text(
        original in ascii_text(),
        pos in 0usize..64,
        payload in ascii_text(),
    ) {
        let op = EditOperation::delete(pos, payload, OperationSource::User);
        prop_assert_eq!(op.apply_replay(&original), original);
    }

    #[test]
    fn replay_ending_in_replace_equals_its_payload(
        original in ascii_text(),
        mut ops in prop::collection::vec(arb_op(), 0..10),
        pos in 0usize..64,
        payload in ascii_text(),
    ) {
        ops.push(EditOperation::replace(pos, payload.clone(), OperationSource::Agent));
        let target = ops.len() as isize - 1;
        prop_assert_eq!(replay(&original, &ops, target), payload);
    }

    #[test]
    fn insert_then_undo_returns_to_start(
        original in ascii_text(),
        text in ascii_text(),
        pos in 0usize..41,
    ) {
        let mut session = EditingSession::new("owner", original.clone(), 100);
        prop_assume!(pos <= original.len());
        session.apply_insert(pos, &text).unwrap();
        prop_assert!(session.undo());
        prop_assert_eq!(session.current_text(), original);
    }

    #[test]
    fn undo_then_redo_restores_forward_state(
        original in ascii_text(),
        texts in prop::collection::vec(ascii_text(), 1..6),
    ) {
        let mut session = EditingSession::new("owner", original, 100);
        for text in &texts {
            session.set_content(text, OperationSource::User);
        }
        let before = session.current_text().to_string();
        prop_assert!(session.undo());
        prop_assert!(session.redo());
        prop_assert_eq!(session.current_text(), before);
    }

    #[test]
    fn log_never_exceeds_cap_and_cursor_stays_valid(
        cap in 1usize..10,
        edits in prop::collection::vec(ascii_text(), 0..30),
    ) {
        let mut session = EditingSession::new("owner", "", cap);
        for text in &edits {
            session.set_content(text, OperationSource::User);
            prop_assert!(session.history().len() <= cap);
            prop_assert!(session.cursor() >= 0);
            prop_assert!((session.cursor() as usize) < session.history().len());
        }
    }

    #[test]
    fn fresh_edit_always_clears_redo(
        original in ascii_text(),
        texts in prop::collection::vec(ascii_text(), 2..6),
    ) {
        let mut session = EditingSession::new("owner", original, 100);
        for text in &texts {
            session.set_content(text, OperationSource::User);
        }
        session.undo();
        prop_assert!(session.can_redo());

        session.set_content("fresh", OperationSource::User);
        prop_assert!(!session.can_redo());
    }
}
