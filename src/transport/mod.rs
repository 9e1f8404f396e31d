//! Transport layer.
//!
//! Implements:
//! - The device message dictionary and per-operation serialization
//! - The token-record read path (device-reported list entries)
//! - The channel boundary (single-in-flight, per-message failure)
//! - The FIFO transport queue that drains past failures

mod channel;
mod message;
mod queue;

#[cfg(test)]
pub(crate) use channel::testing;

pub use channel::*;
pub use message::*;
pub use queue::*;
