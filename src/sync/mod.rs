//! Reconciliation layer.
//!
//! Implements:
//! - Identity-keyed snapshot indexing
//! - Deterministic diffing of two snapshots into an ordered operation list
//! - Unconditional trailing order assertion

mod index;
mod operation;
mod reconcile;

pub use index::*;
pub use operation::*;
pub use reconcile::*;
