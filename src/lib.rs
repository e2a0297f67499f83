//! # treecow - concurrent immutable-tree application state
//!
//! `treecow` gives an application a tree-shaped piece of state that many
//! readers can observe lock-free while a single writer at a time edits it
//! through ordinary mutable Rust references, with structural sharing so an
//! edit deep in a large tree only allocates along the path from the edited
//! node to the root.
//!
//! The design traces back to a C++ state-management library built around
//! `shared_ptr`-based copy-on-write; this crate reworks the same algorithm
//! onto `Arc`/`Weak`, which (unlike `shared_ptr::use_count`) exposes strong
//! and weak reference counts separately, so uniqueness testing needs no
//! extra bookkeeping (see [`node`] and `DESIGN.md`).
//!
//! ## Building blocks
//!
//! - [`Node`]/[`OptNode`] — an owning, copy-on-write handle to one tree
//!   element.
//! - [`Detached`]/[`OptDetached`] — an immutable, freely shareable snapshot
//!   of a payload.
//! - [`Fingerprint`] — a weak, non-owning identity token.
//! - [`NodeVector`]/[`Vector`] — copy-on-write sequences, the former holding
//!   nested `Node` children, the latter plain values.
//! - [`NodeTransaction`]/[`NodeRef`] — a scoped, revertible edit session
//!   against a single `Node`.
//! - [`LocalState`] — a single-threaded root holder with explicit
//!   begin/end-transaction bookkeeping.
//! - [`SharedState`] — the concurrent container: lock-free [`Detached`]
//!   snapshots for readers, a mutex-serialized [`shared_state::Transaction`]
//!   for the writer.
//! - [`Publisher`]/[`Subscriber`] — a weakly-held observer list for
//!   broadcasting "the root changed" notifications.
//!
//! ## Error handling
//!
//! Nearly everything in this crate treats contract violations (writing to
//! an empty [`OptNode`], indexing a vector out of bounds, opening a second
//! transaction on a [`LocalState`] that already has one open) as
//! programmer errors, and panics. The one exception is
//! `TryFrom<OptDetached<T>> for Detached<T>`, which returns a
//! [`ContractError`] — see [`error`] for why that one case gets a
//! recoverable `Result` instead of a panic.
//!
//! ## Logging
//!
//! Transaction commit/abort/revert and subscriber notification emit
//! `trace`/`debug`-level records through the [`log`] facade. Bring in a
//! logger implementation (`env_logger` in this crate's own tests and
//! benchmarks) to see them.
//!
//! ## `loom`
//!
//! The writer-side protocol in [`shared_state`] is exercised under
//! [`loom`](https://docs.rs/loom)'s model checker in this crate's test
//! suite, gated behind `cfg(loom)`. See [`sync`] for the indirection that
//! makes this possible without touching the production code path.

mod detached;
mod error;
mod fingerprint;
mod local_state;
mod node;
mod payload;
mod pubsub;
mod sync;
mod transaction;
mod vector;

pub mod shared_state;

pub use detached::{Detached, OptDetached};
pub use error::ContractError;
pub use fingerprint::Fingerprint;
pub use local_state::LocalState;
pub use node::{Node, OptNode};
pub use pubsub::{Publisher, Subscriber};
pub use shared_state::SharedState;
pub use transaction::{NodeRef, NodeTransaction};
pub use vector::{NodeVector, Vector};
