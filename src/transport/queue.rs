//! The transport queue.
//!
//! An ordered, single-consumer outbound queue over the device channel.
//! Messages go out strictly FIFO with at most one in flight. A failed
//! send is logged and the queue advances to the next message. There is
//! no retry and no halt, so a batch keeps making forward progress
//! through isolated channel hiccups.
//!
//! The queue has two layers. [`TransportQueue::enqueue`],
//! [`TransportQueue::begin_send`] and the `complete_*` transitions form
//! the raw state machine, for embedders with their own scheduling.
//! [`TransportQueue::drain`] is the async driver over a [`Channel`].

use std::collections::VecDeque;

use tracing::warn;

use super::channel::{Channel, SendFailure};
use super::message::DeviceMessage;

/// Queue lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// No pending messages, nothing in flight.
    Idle,
    /// Messages pending or one in flight.
    Draining,
}

/// Outcome summary of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Messages handed to the channel (each exactly once).
    pub attempted: usize,
    /// Messages the channel confirmed delivered.
    pub delivered: usize,
    /// Per-message failures, in send order. Diagnostics only.
    pub failures: Vec<SendFailure>,
}

impl DrainReport {
    /// Whether every attempted message was delivered.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// FIFO outbound queue with a single in-flight message.
///
/// The queue exclusively owns its pending-message order; a queued
/// message is dequeued exactly once, sent, and discarded whether the
/// send succeeded or failed.
#[derive(Debug, Default)]
pub struct TransportQueue {
    pending: VecDeque<DeviceMessage>,
    in_flight: bool,
    delivered: u64,
    failed: u64,
}

impl TransportQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        TransportQueue::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> QueueState {
        if self.in_flight || !self.pending.is_empty() {
            QueueState::Draining
        } else {
            QueueState::Idle
        }
    }

    /// Number of messages waiting (excluding any in flight).
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending or in flight.
    pub fn is_empty(&self) -> bool {
        self.state() == QueueState::Idle
    }

    /// Lifetime count of delivered messages.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Lifetime count of failed messages.
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Append a message at the tail.
    ///
    /// Returns `true` when the queue was idle, i.e. the caller should
    /// start a drain. An enqueue while draining only appends; it never
    /// triggers a second concurrent send.
    pub fn enqueue(&mut self, message: DeviceMessage) -> bool {
        let was_idle = self.state() == QueueState::Idle;
        self.pending.push_back(message);
        was_idle
    }

    /// Dequeue the head for sending.
    ///
    /// Returns `None` while a send is in flight (reentrancy guard) or
    /// when nothing is pending. The caller must report the outcome via
    /// [`TransportQueue::complete_success`] or
    /// [`TransportQueue::complete_failure`] before the next message can
    /// go out.
    pub fn begin_send(&mut self) -> Option<DeviceMessage> {
        if self.in_flight {
            return None;
        }
        let message = self.pending.pop_front()?;
        self.in_flight = true;
        Some(message)
    }

    /// The in-flight send was delivered.
    pub fn complete_success(&mut self) {
        debug_assert!(self.in_flight, "completion without an in-flight send");
        self.in_flight = false;
        self.delivered += 1;
    }

    /// The in-flight send failed. Logged and counted; the queue advances
    /// as on success.
    pub fn complete_failure(&mut self, failure: &SendFailure) {
        debug_assert!(self.in_flight, "completion without an in-flight send");
        warn!(reason = %failure.reason, "message transmit failed, continuing");
        self.in_flight = false;
        self.failed += 1;
    }

    /// Send every pending message over `channel`, one at a time, in
    /// order, continuing past failures. Returns with the queue `Idle`.
    pub async fn drain<C: Channel + ?Sized>(&mut self, channel: &mut C) -> DrainReport {
        let mut report = DrainReport::default();
        while let Some(message) = self.begin_send() {
            report.attempted += 1;
            match channel.send(&message).await {
                Ok(()) => {
                    self.complete_success();
                    report.delivered += 1;
                }
                Err(failure) => {
                    self.complete_failure(&failure);
                    report.failures.push(failure);
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedChannel;
    use crate::transport::{FieldValue, MessageKey};

    fn message(tag: i32) -> DeviceMessage {
        DeviceMessage::new().with(MessageKey::DeleteToken, FieldValue::Int(tag))
    }

    #[test]
    fn test_enqueue_reports_idle_transition() {
        let mut queue = TransportQueue::new();
        assert_eq!(queue.state(), QueueState::Idle);
        assert!(queue.enqueue(message(1)));
        assert_eq!(queue.state(), QueueState::Draining);
        // Already draining: append only.
        assert!(!queue.enqueue(message(2)));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_single_in_flight() {
        let mut queue = TransportQueue::new();
        queue.enqueue(message(1));
        queue.enqueue(message(2));

        let first = queue.begin_send().unwrap();
        assert_eq!(first, message(1));
        // Second dequeue refused while the first is unresolved.
        assert!(queue.begin_send().is_none());

        queue.complete_success();
        let second = queue.begin_send().unwrap();
        assert_eq!(second, message(2));
    }

    #[test]
    fn test_enqueue_during_send_appends_only() {
        let mut queue = TransportQueue::new();
        queue.enqueue(message(1));
        let _head = queue.begin_send().unwrap();

        assert!(!queue.enqueue(message(2)));
        assert!(queue.begin_send().is_none());

        queue.complete_failure(&SendFailure::new("hiccup"));
        assert_eq!(queue.begin_send(), Some(message(2)));
    }

    #[test]
    fn test_failure_advances_like_success() {
        let mut queue = TransportQueue::new();
        queue.enqueue(message(1));
        queue.enqueue(message(2));

        queue.begin_send().unwrap();
        queue.complete_failure(&SendFailure::new("lost"));
        queue.begin_send().unwrap();
        queue.complete_success();

        assert_eq!(queue.state(), QueueState::Idle);
        assert_eq!(queue.delivered(), 1);
        assert_eq!(queue.failed(), 1);
    }

    #[tokio::test]
    async fn test_drain_fifo_under_failure() {
        let mut queue = TransportQueue::new();
        queue.enqueue(message(1)); // A: will fail
        queue.enqueue(message(2)); // B
        queue.enqueue(message(3)); // C

        let mut channel =
            ScriptedChannel::scripted([Err(SendFailure::new("radio dropout")), Ok(()), Ok(())]);
        let report = queue.drain(&mut channel).await;

        // Each attempted exactly once, in order, despite A failing.
        assert_eq!(
            channel.sent,
            vec![message(1), message(2), message(3)]
        );
        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_clean());
        assert_eq!(queue.state(), QueueState::Idle);
    }

    #[tokio::test]
    async fn test_drain_empty_queue() {
        let mut queue = TransportQueue::new();
        let mut channel = ScriptedChannel::reliable();
        let report = queue.drain(&mut channel).await;

        assert_eq!(report, DrainReport::default());
        assert!(channel.sent.is_empty());
        assert_eq!(queue.state(), QueueState::Idle);
    }

    #[tokio::test]
    async fn test_drain_twice_never_resends() {
        let mut queue = TransportQueue::new();
        queue.enqueue(message(1));

        let mut channel = ScriptedChannel::scripted([Err(SendFailure::new("once"))]);
        queue.drain(&mut channel).await;
        let second = queue.drain(&mut channel).await;

        // The failed message was discarded, not retried.
        assert_eq!(channel.sent.len(), 1);
        assert_eq!(second.attempted, 0);
    }
}
