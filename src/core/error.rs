//! Top-level error type.
//!
//! Each layer defines its own error enum next to the code that raises it;
//! this wrapper exists for callers that funnel all layers into one
//! `Result` type.

use thiserror::Error;

/// Top-level wristsync errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WristsyncError {
    /// Secret codec error.
    #[cfg(feature = "codec")]
    #[error("secret decode error: {0}")]
    Secret(#[from] crate::codec::SecretDecodeError),

    /// Device message error.
    #[cfg(feature = "transport")]
    #[error("message error: {0}")]
    Message(#[from] crate::transport::MessageError),

    /// Session error.
    #[cfg(feature = "client")]
    #[error("session error: {0}")]
    Session(#[from] crate::client::SessionError),
}
