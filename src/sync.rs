//! Thin indirection over `std::sync` so the writer-side protocol in
//! [`crate::shared_state`] and [`crate::pubsub`] can be exercised under `loom`'s
//! model checker without changing a single line of the algorithm itself.
//!
//! This mirrors the `sync` shim used by `reft-light` (left-right) and
//! `local-rcu`: normal builds use the real standard library primitives;
//! `cfg(loom)` builds swap in `loom`'s instrumented equivalents.

#[cfg(loom)]
pub(crate) use loom::sync::{Mutex, MutexGuard};

#[cfg(not(loom))]
pub(crate) use std::sync::{Mutex, MutexGuard};
