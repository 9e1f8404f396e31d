//! Sync session: the editor-facing surface.
//!
//! A session owns the device channel, the transport queue, and the
//! last-synced snapshot. The editor hands it a full new snapshot once per
//! user-confirmed save; the session reconciles, drains the resulting
//! operations, and retains the new snapshot (secrets stripped) as the
//! next baseline. Individual send failures are logged, never surfaced as
//! a blocking error to the user.

use thiserror::Error;
use tracing::debug;

use crate::core::{Snapshot, TokenId};
use crate::sync::{Operation, reconcile};
use crate::transport::{
    Channel, DeviceMessage, DrainReport, InboundReceiver, MessageError, QueueState, TransportQueue,
};

/// Errors raised at the session boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A previous reconciliation pass is still draining. Starting another
    /// would make operation interleaving unspecified.
    #[error("a previous sync is still draining")]
    SyncInProgress,

    /// A creation reached the save step without usable secret bytes.
    /// Nothing was enqueued.
    #[error("token {id} has no secret; cannot create it on the device")]
    MissingSecret {
        /// Id of the offending token.
        id: TokenId,
    },

    /// An inbound device message could not be decoded.
    #[error("inbound message error: {0}")]
    Inbound(#[from] MessageError),
}

/// Outcome of one save pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Tokens created on the device.
    pub created: usize,
    /// Tokens renamed.
    pub updated: usize,
    /// Tokens deleted.
    pub deleted: usize,
    /// Per-message delivery outcome of the drain.
    pub drain: DrainReport,
}

/// One editor session against one device copy.
///
/// Exactly one editor session reconciles against exactly one device copy
/// at a time; snapshot state is threaded explicitly through the session,
/// never held globally.
#[derive(Debug)]
pub struct SyncSession<C> {
    channel: C,
    queue: TransportQueue,
    tokens: Snapshot,
}

impl<C: Channel> SyncSession<C> {
    /// Start a session with no known device state. The baseline fills in
    /// from [`SyncSession::request_token_list`] followed by inbound
    /// record messages, or stays empty for a fresh device.
    pub fn new(channel: C) -> Self {
        SyncSession {
            channel,
            queue: TransportQueue::new(),
            tokens: Snapshot::new(),
        }
    }

    /// The last-synced snapshot (the device's state as far as this
    /// session knows).
    pub fn tokens(&self) -> &Snapshot {
        &self.tokens
    }

    /// Lowest id not used by the current snapshot and not in `blocked`
    /// (ids deleted earlier in this editing session stay blocked until
    /// their deletion has been reconciled).
    pub fn next_free_id(&self, blocked: &[TokenId]) -> Option<TokenId> {
        self.tokens.next_free_id(blocked)
    }

    /// Ask the device to report its token list. The records arrive as
    /// inbound messages; feed them to
    /// [`SyncSession::handle_device_message`].
    pub async fn request_token_list(&mut self) -> Result<DrainReport, SessionError> {
        self.send_single(DeviceMessage::read_token_list()).await
    }

    /// Push the local UTC offset (signed seconds east of UTC) to the
    /// device, typically once at startup.
    pub async fn announce_utc_offset(&mut self, seconds: i32) -> Result<DrainReport, SessionError> {
        self.send_single(DeviceMessage::set_utc_offset(seconds)).await
    }

    /// Ingest one device-originated message.
    ///
    /// Token list records append to the session snapshot in arrival
    /// order (the device reports them in list order). Returns `true` if
    /// the message was a token record, `false` if it was something this
    /// session does not consume.
    pub fn handle_device_message(&mut self, message: &DeviceMessage) -> Result<bool, SessionError> {
        match message.token_list_result() {
            Some(record) => {
                let token = record?;
                debug!(id = %token.id, name = %token.name, "device reported token");
                self.tokens.push(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drain whatever inbound messages are currently pending. Returns
    /// the number of token records ingested.
    pub fn ingest_inbound(&mut self, inbound: &mut InboundReceiver) -> Result<usize, SessionError> {
        let mut ingested = 0;
        while let Ok(message) = inbound.try_recv() {
            if self.handle_device_message(&message)? {
                ingested += 1;
            }
        }
        Ok(ingested)
    }

    /// One user-confirmed save: reconcile the editor's snapshot against
    /// the last-synced one, deliver the operations, and adopt `new`
    /// (secrets stripped) as the next baseline.
    ///
    /// Fails without enqueuing anything if a previous pass is still
    /// draining or if any would-be creation lacks a non-empty secret.
    /// Per-message send failures do not fail the save; they are reported
    /// in the [`SaveReport`] and the operational log only.
    pub async fn save(&mut self, mut new: Snapshot) -> Result<SaveReport, SessionError> {
        if self.queue.state() == QueueState::Draining {
            return Err(SessionError::SyncInProgress);
        }

        let operations = reconcile(&self.tokens, &new);

        // Validate every creation before anything is enqueued; a
        // malformed secret must abort the whole pass, not half of it.
        for operation in &operations {
            if let Operation::Create { id, secret, .. } = operation {
                if secret.is_empty() {
                    return Err(SessionError::MissingSecret { id: *id });
                }
            }
        }

        let mut report = SaveReport::default();
        for operation in &operations {
            match operation {
                Operation::Create { .. } => report.created += 1,
                Operation::Update { .. } => report.updated += 1,
                Operation::Delete(_) => report.deleted += 1,
                Operation::SetOrder(_) => {}
            }
            self.queue.enqueue(DeviceMessage::from_operation(operation));
        }

        report.drain = self.queue.drain(&mut self.channel).await;

        new.strip_secrets();
        self.tokens = new;

        Ok(report)
    }

    async fn send_single(&mut self, message: DeviceMessage) -> Result<DrainReport, SessionError> {
        if self.queue.state() == QueueState::Draining {
            return Err(SessionError::SyncInProgress);
        }
        self.queue.enqueue(message);
        Ok(self.queue.drain(&mut self.channel).await)
    }
}
