//! Single-threaded state container: no locking, no atomics.
//!
//! Ported from `kuzco::LocalState<T>` (`LocalState.hpp`).

use crate::detached::Detached;
use crate::node::Node;
use crate::payload::Payload;
use crate::transaction::NodeRef;

/// A single-thread root holder with explicit begin/end transaction
/// semantics (no mutex, no atomics — see spec.md §4.3).
///
/// Property (spec.md §4.3): if a transaction performs no edits, no
/// allocation happens and the published root's identity is preserved.
pub struct LocalState<T> {
    root: Node<T>,
    restore: Option<Payload<T>>,
}

impl<T> LocalState<T> {
    /// Constructs a new local state rooted at `root`.
    pub fn new(root: Node<T>) -> Self {
        LocalState { root, restore: None }
    }

    /// Opens a transaction, capturing the current payload as a restore
    /// point, and hands back a mutable reference to the root.
    ///
    /// # Panics
    /// Panics if a transaction is already open.
    pub fn begin_transaction(&mut self) -> NodeRef<'_, T> {
        assert!(self.restore.is_none(), "a transaction is already in progress");
        self.restore = Some(self.root.payload().clone());
        NodeRef::some(&mut self.root)
    }

    /// Closes the transaction. If `commit` is `false` and the root changed
    /// during the transaction, the root is rebound to the restore point.
    /// Returns whether the root ended up changed.
    ///
    /// # Panics
    /// Panics if no transaction is open.
    pub fn end_transaction(&mut self, commit: bool) -> bool {
        let restore = self.restore.take().expect("no transaction is in progress");
        let mut changed = !self.root.payload().ptr_eq(&restore);
        if !commit && changed {
            self.root.set_payload(restore);
            changed = false;
        }
        changed
    }

    /// An atomic (trivially so — single-threaded) snapshot of the current
    /// state.
    pub fn detach(&self) -> Detached<T> {
        self.root.detach()
    }
}
