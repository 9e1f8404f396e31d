//! High-level session API.
//!
//! Ties the layers together for an embedding companion app: one
//! [`SyncSession`] per device connection, holding the last-synced
//! snapshot, the transport queue, and the channel binding.

mod session;

pub use session::*;
