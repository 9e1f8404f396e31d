//! Identity index: id-keyed lookup over one snapshot.
//!
//! Derived and ephemeral; rebuilt per snapshot comparison, never
//! persisted. The reconciliation engine looks tokens up repeatedly while
//! scanning the opposite snapshot, so lookup must be O(1) amortized
//! rather than a linear rescan.

use std::collections::HashMap;

use crate::core::{Snapshot, Token, TokenId};

/// Id-keyed view of one snapshot's tokens.
#[derive(Debug)]
pub struct IdentityIndex<'a> {
    map: HashMap<TokenId, &'a Token>,
}

impl<'a> IdentityIndex<'a> {
    /// Build the index in O(n) over the snapshot.
    ///
    /// If the snapshot violates the unique-id precondition, later entries
    /// shadow earlier ones; reconciliation behavior is unspecified in
    /// that case.
    pub fn build(snapshot: &'a Snapshot) -> Self {
        let mut map = HashMap::with_capacity(snapshot.len());
        for token in snapshot {
            map.insert(token.id, token);
        }
        IdentityIndex { map }
    }

    /// Look up a token by id.
    pub fn get(&self, id: TokenId) -> Option<&'a Token> {
        self.map.get(&id).copied()
    }

    /// Whether the id is present.
    pub fn contains(&self, id: TokenId) -> bool {
        self.map.contains_key(&id)
    }

    /// Number of indexed tokens.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
