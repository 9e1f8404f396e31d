//! Core data model: tokens, snapshots, constants, and error types.
//!
//! Everything here is always compiled; the feature-gated layers build on
//! these types.

pub mod constants;
mod error;
mod token;

pub use error::*;
pub use token::*;
