//! Snapshot reconciliation.
//!
//! Pure diffing of an old snapshot (the device's last known state)
//! against a new one (the editor's current state) into the ordered
//! operation list that transforms old into new.

use tracing::debug;

use super::index::IdentityIndex;
use super::operation::Operation;
use crate::core::{Secret, Snapshot};

/// Diff `old` against `new` into an ordered operation list.
///
/// Operation order is deterministic:
/// 1. one `Delete` per id present in `old` but absent from `new`, in
///    `old`'s iteration order;
/// 2. `Create`s and `Update`s interleaved in `new`'s order: `Create`
///    for ids unknown to `old`, `Update` only when the name differs
///    byte-for-byte, nothing for unchanged tokens;
/// 3. exactly one trailing `SetOrder` with `new`'s ids in `new`'s order,
///    emitted even when nothing else changed, so the device's display
///    order tracks the editor's unconditionally.
///
/// Deletions go first so identity slots are freed before any creation
/// could collide with them on the device.
///
/// Updates never carry secret material; rotating a secret requires
/// delete + recreate.
///
/// # Preconditions
///
/// Ids must be unique within each snapshot, and every token new to `new`
/// must carry a non-empty secret. Neither is checked here: a duplicate
/// id makes the result unspecified, and a missing secret yields a
/// `Create` with empty bytes that the session layer rejects before it is
/// ever enqueued.
pub fn reconcile(old: &Snapshot, new: &Snapshot) -> Vec<Operation> {
    let old_index = IdentityIndex::build(old);
    let new_index = IdentityIndex::build(new);

    let mut operations = Vec::new();

    for token in old {
        if !new_index.contains(token.id) {
            operations.push(Operation::Delete(token.id));
        }
    }

    for token in new {
        match old_index.get(token.id) {
            None => {
                operations.push(Operation::Create {
                    id: token.id,
                    name: token.name.clone(),
                    secret: token
                        .secret
                        .clone()
                        .unwrap_or_else(|| Secret::new(Vec::new())),
                });
            }
            Some(existing) if existing.name != token.name => {
                operations.push(Operation::Update {
                    id: token.id,
                    name: token.name.clone(),
                });
            }
            Some(_) => {}
        }
    }

    operations.push(Operation::SetOrder(new.ids().collect()));

    // Names and ids only; secret bytes never reach the log.
    debug!(
        deletes = operations.iter().filter(|op| matches!(op, Operation::Delete(_))).count(),
        creates = operations.iter().filter(|op| matches!(op, Operation::Create { .. })).count(),
        updates = operations.iter().filter(|op| matches!(op, Operation::Update { .. })).count(),
        order_len = new.len(),
        "reconciled snapshots"
    );

    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Token, TokenId};

    fn secret(byte: u8) -> Secret {
        Secret::new(vec![byte; 10])
    }

    #[test]
    fn test_identity_preservation() {
        let snapshot = Snapshot::from_tokens(vec![
            Token::new(TokenId(1), "a"),
            Token::new(TokenId(2), "b"),
        ]);
        let ops = reconcile(&snapshot, &snapshot);
        assert_eq!(ops, vec![Operation::SetOrder(vec![TokenId(1), TokenId(2)])]);
    }

    #[test]
    fn test_empty_snapshots() {
        let ops = reconcile(&Snapshot::new(), &Snapshot::new());
        assert_eq!(ops, vec![Operation::SetOrder(vec![])]);
    }

    #[test]
    fn test_initial_sync_creates_all() {
        let new = Snapshot::from_tokens(vec![
            Token::with_secret(TokenId(0), "a", secret(1)),
            Token::with_secret(TokenId(1), "b", secret(2)),
        ]);
        let ops = reconcile(&Snapshot::new(), &new);
        assert_eq!(ops.len(), 3);
        assert!(matches!(&ops[0], Operation::Create { id: TokenId(0), .. }));
        assert!(matches!(&ops[1], Operation::Create { id: TokenId(1), .. }));
        assert_eq!(ops[2], Operation::SetOrder(vec![TokenId(0), TokenId(1)]));
    }

    #[test]
    fn test_deletion_completeness() {
        let old = Snapshot::from_tokens(vec![
            Token::new(TokenId(1), "a"),
            Token::new(TokenId(2), "b"),
            Token::new(TokenId(3), "c"),
        ]);
        let new = Snapshot::from_tokens(vec![Token::new(TokenId(2), "b")]);
        let ops = reconcile(&old, &new);

        let deletes: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::Delete(id) => Some(*id),
                _ => None,
            })
            .collect();
        // Every id absent from new is deleted once, in old's order; ids
        // present in both are never deleted.
        assert_eq!(deletes, vec![TokenId(1), TokenId(3)]);
    }

    #[test]
    fn test_delete_all() {
        let old = Snapshot::from_tokens(vec![Token::new(TokenId(1), "a")]);
        let ops = reconcile(&old, &Snapshot::new());
        assert_eq!(
            ops,
            vec![Operation::Delete(TokenId(1)), Operation::SetOrder(vec![])]
        );
    }

    #[test]
    fn test_creation_carries_name_and_secret() {
        let old = Snapshot::from_tokens(vec![Token::new(TokenId(1), "a")]);
        let new = Snapshot::from_tokens(vec![
            Token::new(TokenId(1), "a"),
            Token::with_secret(TokenId(2), "fresh", secret(9)),
        ]);
        let ops = reconcile(&old, &new);

        assert_eq!(ops.len(), 2);
        match &ops[0] {
            Operation::Create { id, name, secret } => {
                assert_eq!(*id, TokenId(2));
                assert_eq!(name, "fresh");
                assert_eq!(secret.as_bytes(), &[9u8; 10]);
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_update_minimality() {
        let old = Snapshot::from_tokens(vec![
            Token::new(TokenId(1), "same"),
            Token::new(TokenId(2), "before"),
        ]);
        let new = Snapshot::from_tokens(vec![
            Token::new(TokenId(1), "same"),
            Token::new(TokenId(2), "after"),
        ]);
        let ops = reconcile(&old, &new);

        // Unchanged token yields nothing; renamed token yields exactly
        // one update with no secret attached.
        assert_eq!(
            ops,
            vec![
                Operation::Update {
                    id: TokenId(2),
                    name: "after".into()
                },
                Operation::SetOrder(vec![TokenId(1), TokenId(2)]),
            ]
        );
    }

    #[test]
    fn test_reorder_only_still_asserts_order() {
        let old = Snapshot::from_tokens(vec![
            Token::new(TokenId(1), "a"),
            Token::new(TokenId(2), "b"),
        ]);
        let new = Snapshot::from_tokens(vec![
            Token::new(TokenId(2), "b"),
            Token::new(TokenId(1), "a"),
        ]);
        let ops = reconcile(&old, &new);
        assert_eq!(ops, vec![Operation::SetOrder(vec![TokenId(2), TokenId(1)])]);
    }

    #[test]
    fn test_trailing_set_order_always_last() {
        let old = Snapshot::from_tokens(vec![Token::new(TokenId(1), "a")]);
        let new = Snapshot::from_tokens(vec![
            Token::with_secret(TokenId(2), "b", secret(1)),
            Token::with_secret(TokenId(3), "c", secret(2)),
        ]);
        let ops = reconcile(&old, &new);
        assert_eq!(
            ops.last(),
            Some(&Operation::SetOrder(vec![TokenId(2), TokenId(3)]))
        );
        let order_ops = ops
            .iter()
            .filter(|op| matches!(op, Operation::SetOrder(_)))
            .count();
        assert_eq!(order_ops, 1);
    }

    #[test]
    fn test_mixed_example() {
        // old = [{1,"A"}, {2,"B"}], new = [{2,"B2"}, {3,"C",secret}]
        let old = Snapshot::from_tokens(vec![
            Token::new(TokenId(1), "A"),
            Token::new(TokenId(2), "B"),
        ]);
        let new = Snapshot::from_tokens(vec![
            Token::new(TokenId(2), "B2"),
            Token::with_secret(TokenId(3), "C", secret(7)),
        ]);
        let ops = reconcile(&old, &new);

        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], Operation::Delete(TokenId(1)));
        assert_eq!(
            ops[1],
            Operation::Update {
                id: TokenId(2),
                name: "B2".into()
            }
        );
        assert!(matches!(&ops[2], Operation::Create { id: TokenId(3), .. }));
        assert_eq!(ops[3], Operation::SetOrder(vec![TokenId(2), TokenId(3)]));
    }

    #[test]
    fn test_creations_and_updates_follow_new_order() {
        let old = Snapshot::from_tokens(vec![Token::new(TokenId(5), "e")]);
        let new = Snapshot::from_tokens(vec![
            Token::with_secret(TokenId(9), "i", secret(1)),
            Token::new(TokenId(5), "e2"),
            Token::with_secret(TokenId(7), "g", secret(2)),
        ]);
        let ops = reconcile(&old, &new);

        let kinds: Vec<_> = ops.iter().map(|op| (op.kind(), op.target())).collect();
        assert_eq!(
            kinds,
            vec![
                ("create", Some(TokenId(9))),
                ("update", Some(TokenId(5))),
                ("create", Some(TokenId(7))),
                ("set-order", None),
            ]
        );
    }
}
