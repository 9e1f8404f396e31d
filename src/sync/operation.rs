//! Device update operations.
//!
//! The strict tagged representation of what a reconciliation pass asks
//! the device to do. Each variant has exactly one wire serialization
//! (see [`DeviceMessage::from_operation`](crate::transport::DeviceMessage::from_operation)).

use std::fmt;

use crate::core::{Secret, TokenId};

/// One ordered update the device must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Remove the token with this id, freeing the id for later reuse.
    Delete(TokenId),

    /// Add a new token. Secret material travels only here; updates never
    /// carry it (secret rotation is delete + recreate).
    Create {
        /// Id assigned by the editor.
        id: TokenId,
        /// Display name.
        name: String,
        /// Raw secret bytes, required non-empty (caller precondition).
        secret: Secret,
    },

    /// Rename an existing token.
    Update {
        /// Id of the token to rename.
        id: TokenId,
        /// New display name.
        name: String,
    },

    /// Replace the device's display order. Always the final operation of
    /// a reconciliation pass, listing the full post-sync membership.
    SetOrder(Vec<TokenId>),
}

impl Operation {
    /// The id this operation targets, or `None` for [`Operation::SetOrder`].
    pub fn target(&self) -> Option<TokenId> {
        match self {
            Operation::Delete(id) => Some(*id),
            Operation::Create { id, .. } => Some(*id),
            Operation::Update { id, .. } => Some(*id),
            Operation::SetOrder(_) => None,
        }
    }

    /// Short operation name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Delete(_) => "delete",
            Operation::Create { .. } => "create",
            Operation::Update { .. } => "update",
            Operation::SetOrder(_) => "set-order",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete(id) => write!(f, "delete {id}"),
            Operation::Create { id, name, .. } => write!(f, "create {id} ({name})"),
            Operation::Update { id, name } => write!(f, "update {id} ({name})"),
            Operation::SetOrder(ids) => write!(f, "set-order of {} tokens", ids.len()),
        }
    }
}
