//! The crate's single fallible-construction error.
//!
//! Every other programmer-contract violation described in the design (an
//! out-of-bounds vector access, calling [`crate::node::OptNode::write`] on an
//! empty node) is a panic, not a [`ContractError`] — see the crate-level docs
//! for the rationale.

use thiserror::Error;

/// The one constructor in the crate that can fail: building a non-null
/// [`crate::detached::Detached`] from a [`crate::detached::OptDetached`] that
/// happens to be empty.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractError {
    /// Attempted to convert an empty optional handle into a non-null one.
    #[error("attempted to detach a null OptDetached/OptNode into a non-null Detached/Node")]
    EmptyOptional,
}
