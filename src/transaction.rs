//! Scoped, revertible edit sessions against a [`Node`], and the "reference
//! that might not exist" helper used by vector search.
//!
//! Ported from `kuzco::NodeTransaction<T>` / `kuzco::NodeRef<T>`
//! (`NodeTransaction.hpp`, `NodeRef.hpp`).

use crate::detached::Detached;
use crate::node::Node;
use crate::payload::Payload;

/// A reference to a [`Node`] that may or may not be bound — returned by
/// [`crate::vector::NodeVector::find_if`], which has nothing to point at
/// when no child matches the predicate.
pub struct NodeRef<'a, T> {
    node: Option<&'a mut Node<T>>,
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn some(node: &'a mut Node<T>) -> Self {
        NodeRef { node: Some(node) }
    }

    /// The empty reference.
    pub fn none() -> Self {
        NodeRef { node: None }
    }

    /// Whether this reference is bound to a node.
    pub fn is_some(&self) -> bool {
        self.node.is_some()
    }

    /// Read access without triggering COW. Returns `None` if unbound.
    pub fn read(&self) -> Option<&T> {
        self.node.as_deref().map(Node::read)
    }

    /// Mutable, COW-triggering access. Panics if unbound.
    pub fn write(&mut self) -> &mut T
    where
        T: Clone,
    {
        self.node
            .as_deref_mut()
            .expect("NodeRef::write called on an empty reference")
            .write()
    }
}

/// A scoped edit session against a [`Node`], with an implicit restore point.
///
/// Dropping a `NodeTransaction` completes it: if the surrounding scope is
/// unwinding due to a panic, the transaction aborts (restoring the original
/// payload); otherwise it commits (keeping whatever the transaction wrote).
/// This mirrors spec.md §4.3 point 6 and §5's "implicit completion" rule, and
/// the original's `~NodeTransaction()` use of `std::uncaught_exceptions()`.
pub struct NodeTransaction<'a, T> {
    node: &'a mut Node<T>,
    restore: Option<Payload<T>>,
}

impl<'a, T> NodeTransaction<'a, T> {
    /// Opens a transaction against `node`, capturing its current payload as
    /// the restore point.
    pub fn new(node: &'a mut Node<T>) -> Self {
        let restore = node.payload().clone();
        NodeTransaction { node, restore: Some(restore) }
    }

    /// Whether this transaction is still open (neither committed nor
    /// aborted).
    pub fn active(&self) -> bool {
        self.restore.is_some()
    }

    /// Restores the root to its pre-transaction payload but keeps the
    /// transaction open, so further edits (and an eventual commit or abort)
    /// are still possible.
    pub fn revert(&mut self) {
        let restore = self.restore.as_ref().expect("transaction is not active").clone();
        self.node.set_payload(restore);
    }

    /// Completes the transaction by discarding all edits and restoring the
    /// original payload. Idempotent if called again after completion would
    /// panic — like the original, a completed transaction's bookkeeping is
    /// one-shot; call [`Self::active`] first if that matters.
    pub fn abort(&mut self) {
        let restore = self.restore.take().expect("transaction is not active");
        self.node.set_payload(restore);
    }

    /// Completes the transaction, keeping whatever edits were made.
    /// Returns whether the root's payload identity actually changed.
    pub fn commit(&mut self) -> bool {
        let restore = self.restore.take().expect("transaction is not active");
        !self.node.payload().ptr_eq(&restore)
    }

    /// Completes the transaction, committing or aborting based on `commit`.
    /// Returns whether the root changed (always `false` on abort).
    pub fn complete(&mut self, commit: bool) -> bool {
        if commit {
            self.commit()
        } else {
            self.abort();
            false
        }
    }

    /// An immutable snapshot of the node's current (in-transaction) value.
    pub fn detach(&self) -> Detached<T> {
        self.node.detach()
    }

    /// Read access without triggering COW.
    pub fn r(&self) -> &T {
        self.node.read()
    }
}

impl<'a, T> std::ops::Deref for NodeTransaction<'a, T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.node.read()
    }
}

impl<'a, T: Clone> std::ops::DerefMut for NodeTransaction<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.node.write()
    }
}

impl<'a, T> Drop for NodeTransaction<'a, T> {
    fn drop(&mut self) {
        let Some(restore) = self.restore.take() else {
            return; // already explicitly completed
        };
        if std::thread::panicking() {
            log::debug!("node transaction dropped during unwind, aborting");
            self.node.set_payload(restore);
        } else {
            log::trace!("node transaction dropped normally, committing");
        }
    }
}
