//! Concurrent state container: lock-free reads, mutex-serialized writer.
//!
//! Ported from `kuzco::SharedState<T>` (`SharedState.hpp`), with the
//! published slot reimplemented on `arc_swap::ArcSwap` — the crate this
//! design's teacher (`anycow`) itself depends on for exactly this job in its
//! `Updatable` variant — in place of the original's
//! `itlib::atomic_shared_ptr_storage`.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::detached::Detached;
use crate::node::Node;
use crate::payload::Payload;
use crate::sync::Mutex;

/// Concurrent state container (spec.md §4.3).
///
/// Readers call [`SharedState::snapshot`], which is a single atomic load and
/// is wait-free on any platform whose atomic pointer load is wait-free.
/// Writers call [`SharedState::begin_transaction`], which serializes on an
/// internal mutex; at most one writer transaction is open at a time (spec.md
/// §3 invariant 5).
pub struct SharedState<T> {
    published: ArcSwap<T>,
    working: Mutex<Node<T>>,
}

impl<T> SharedState<T> {
    /// Constructs a new shared state rooted at `root`. The published
    /// snapshot and the writer's working root start out sharing the same
    /// payload.
    pub fn new(root: Node<T>) -> Self {
        let published = ArcSwap::from(Arc::clone(root.payload().arc()));
        SharedState { published, working: Mutex::new(root) }
    }

    /// An atomic snapshot of the currently published root. Lock-free.
    ///
    /// Ordering (spec.md §5): a `snapshot()` that happens after a commit
    /// returns observes that commit or a later one, never an earlier one —
    /// `ArcSwap`'s internal refcount operations provide this barrier, so no
    /// hand-rolled ordering is needed here.
    pub fn snapshot(&self) -> Detached<T> {
        Detached::from_arc(self.published.load_full())
    }

    /// Opens a writer transaction, blocking until any other in-progress
    /// transaction on this container completes.
    ///
    /// Because the published snapshot holds a strong reference to the same
    /// payload the working root starts from, the working root is guaranteed
    /// non-unique at this point — the transaction's first top-level
    /// [`Transaction::write`]/[`std::ops::DerefMut`] call will allocate
    /// exactly once (spec.md §4.3 point 2).
    pub fn begin_transaction(&self) -> Transaction<'_, T> {
        let guard = self
            .working
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let restore = guard.payload().clone();
        log::trace!("shared state transaction opened");
        Transaction { state: self, guard, restore: Some(restore) }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SharedState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedState").field("published", &*self.snapshot()).finish()
    }
}

/// A scoped writer transaction against a [`SharedState`].
///
/// Like [`crate::transaction::NodeTransaction`], dropping a `Transaction`
/// completes it: it commits on an ordinary scope exit, and aborts if the
/// scope is unwinding due to a panic (spec.md §4.3 point 6, §5
/// "cancellation").
#[must_use = "a transaction does nothing until it is written to and completed (explicitly or on drop)"]
pub struct Transaction<'a, T> {
    state: &'a SharedState<T>,
    guard: crate::sync::MutexGuard<'a, Node<T>>,
    restore: Option<Payload<T>>,
}

impl<'a, T> Transaction<'a, T> {
    /// Whether this transaction is still open.
    pub fn active(&self) -> bool {
        self.restore.is_some()
    }

    /// Restores the working root to its pre-transaction payload but keeps
    /// the transaction open.
    pub fn revert(&mut self) {
        let restore = self.restore.as_ref().expect("transaction is not active").clone();
        self.guard.set_payload(restore);
    }

    /// Completes the transaction by discarding all edits.
    pub fn abort(&mut self) {
        let restore = self.restore.take().expect("transaction is not active");
        self.guard.set_payload(restore);
    }

    /// Completes the transaction, publishing the new root if it changed.
    /// Returns the published (or unchanged) snapshot and whether it changed.
    pub fn commit(&mut self) -> (Detached<T>, bool) {
        let restore = self.restore.take().expect("transaction is not active");
        let changed = !self.guard.payload().ptr_eq(&restore);
        let snapshot = self.guard.detach();
        if changed {
            self.state.published.store(Arc::clone(snapshot.payload_arc()));
            log::debug!("shared state committed: root changed");
        } else {
            log::trace!("shared state committed: no changes");
        }
        (snapshot, changed)
    }

    /// Completes the transaction, committing or aborting based on `commit`.
    pub fn complete(&mut self, commit: bool) -> (Detached<T>, bool) {
        if commit {
            self.commit()
        } else {
            let restore = self.restore.clone().expect("transaction is not active");
            let snapshot = Detached::from_arc(Arc::clone(restore.arc()));
            self.abort();
            (snapshot, false)
        }
    }

    /// An immutable snapshot of the working root's current (in-transaction)
    /// value.
    pub fn detach(&self) -> Detached<T> {
        self.guard.detach()
    }
}

impl<'a, T> std::ops::Deref for Transaction<'a, T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.guard.read()
    }
}

impl<'a, T: Clone> std::ops::DerefMut for Transaction<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.guard.write()
    }
}

impl<'a, T> Drop for Transaction<'a, T> {
    fn drop(&mut self) {
        if self.restore.is_none() {
            return; // explicitly completed already
        }
        if std::thread::panicking() {
            log::debug!("shared state transaction dropped during unwind, aborting");
            self.abort();
        } else {
            log::trace!("shared state transaction dropped normally, committing");
            self.commit();
        }
    }
}
