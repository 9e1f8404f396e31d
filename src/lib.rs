//! # wristsync
//!
//! Companion-side synchronization layer for wearable authenticators.
//!
//! A wearable device stores an ordered list of secret-bearing tokens and
//! accepts only small, ordered update operations over a message channel
//! that carries one transmission at a time and may fail any individual
//! message. The phone-side editor works on full snapshots of the list.
//! This crate bridges the two:
//!
//! - **Reconciliation**: diff two [`Snapshot`](core::Snapshot)s into a
//!   minimal ordered sequence of create/update/delete/reorder
//!   [`Operation`](sync::Operation)s, keyed by token identity rather than
//!   structural equality.
//! - **Transport queue**: serialize operations into device messages and
//!   drain them strictly FIFO, at most one in flight, continuing past
//!   per-message failures instead of stalling the batch.
//!
//! ## Feature Flags
//!
//! - `sync` (default): reconciliation layer (identity index, diff engine)
//! - `codec` (default): secret codec layer (base32 key entry)
//! - `transport` (default): device messages, transport queue, channel boundary
//! - `client` (default): high-level session API
//! - `serde`: serde derives on the editor-facing data model
//!
//! ## Example Usage
//!
//! ```rust
//! use wristsync::prelude::*;
//!
//! let old = Snapshot::from_tokens(vec![
//!     Token::new(TokenId(1), "GitHub"),
//!     Token::new(TokenId(2), "Email"),
//! ]);
//! let new = Snapshot::from_tokens(vec![
//!     Token::new(TokenId(2), "Email (work)"),
//!     Token::with_secret(TokenId(3), "VPN", Secret::new(vec![0xde, 0xad])),
//! ]);
//!
//! let ops = reconcile(&old, &new);
//! assert!(matches!(ops[0], Operation::Delete(TokenId(1))));
//! assert!(matches!(ops.last(), Some(Operation::SetOrder(_))));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

// Reconciliation layer (feature-gated)
#[cfg(feature = "sync")]
#[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
pub mod sync;

// Secret codec layer (feature-gated)
#[cfg(feature = "codec")]
#[cfg_attr(docsrs, doc(cfg(feature = "codec")))]
pub mod codec;

// Transport layer (feature-gated)
#[cfg(feature = "transport")]
#[cfg_attr(docsrs, doc(cfg(feature = "transport")))]
pub mod transport;

// Client session API (feature-gated)
#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod client;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{Secret, Snapshot, Token, TokenId, WristsyncError};

    #[cfg(feature = "sync")]
    pub use crate::sync::{IdentityIndex, Operation, reconcile};

    #[cfg(feature = "codec")]
    pub use crate::codec::{Base32, SecretCodec, SecretDecodeError};

    #[cfg(feature = "transport")]
    pub use crate::transport::{
        Channel, DeviceMessage, DrainReport, FieldValue, MessageKey, SendFailure, TransportQueue,
    };

    #[cfg(feature = "client")]
    pub use crate::client::{SaveReport, SessionError, SyncSession};
}
