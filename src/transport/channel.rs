//! The device channel boundary.
//!
//! The underlying channel accepts only one outstanding transmission at a
//! time and may report per-message failure without affecting channel
//! health. This crate imposes no timeout of its own: the channel must
//! resolve every accepted send, success or failure, exactly once.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::message::DeviceMessage;

/// Capacity of the inbound device-message channel.
pub const INBOUND_CHANNEL_CAPACITY: usize = 32;

/// One message failed to transmit.
///
/// Non-fatal and diagnostics-only: the transport queue logs it and moves
/// on to the next message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("channel send failed: {reason}")]
pub struct SendFailure {
    /// Human-readable failure description from the channel binding.
    pub reason: String,
}

impl SendFailure {
    /// Wrap a channel-specific failure description.
    pub fn new(reason: impl Into<String>) -> Self {
        SendFailure {
            reason: reason.into(),
        }
    }
}

/// Outbound half of the device channel.
#[async_trait]
pub trait Channel: Send {
    /// Deliver one message to the device.
    ///
    /// Must resolve exactly once per call. A synchronous (immediate)
    /// resolution is fine; the transport queue's drain step stays FIFO
    /// either way.
    async fn send(&mut self, message: &DeviceMessage) -> Result<(), SendFailure>;
}

/// Sender half of the inbound device-message stream.
pub type InboundSender = mpsc::Sender<DeviceMessage>;

/// Receiver half of the inbound device-message stream.
pub type InboundReceiver = mpsc::Receiver<DeviceMessage>;

/// Create the inbound plumbing a channel binding pushes device-originated
/// messages into (token list records, primarily).
pub fn inbound_channel() -> (InboundSender, InboundReceiver) {
    mpsc::channel(INBOUND_CHANNEL_CAPACITY)
}
