//! Secret codec layer.
//!
//! Converts a human-entered secret into the raw byte form the device's
//! create operation expects. Decode failures surface to the editor; a
//! creation is aborted before anything is enqueued, never silently
//! skipped.

mod base32;

pub use base32::*;

use thiserror::Error;

use crate::core::Secret;

/// Errors turning a human-entered key into secret bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretDecodeError {
    /// The input contained a character outside the accepted alphabet.
    #[error("character {0:?} out of range")]
    InvalidCharacter(char),

    /// The input produced no secret bytes.
    #[error("input produced no secret bytes")]
    Empty,
}

/// A decoder from human-entered key text to raw secret bytes.
pub trait SecretCodec {
    /// Decode `input` into secret bytes.
    ///
    /// Must never return an empty secret; an input that decodes to no
    /// bytes is an error.
    fn decode(&self, input: &str) -> Result<Secret, SecretDecodeError>;
}
