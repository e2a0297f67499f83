//! Weak, non-owning identity token for a payload.
//!
//! Ported from `kuzco::Fingerprint`, which wraps a type-erased
//! `std::weak_ptr<const void>` so it can be stored without a template
//! parameter. Rust's `Arc`/`Weak` split strong and weak counts cleanly (see
//! `payload.rs`), so there is no safety reason to erase the type here the way
//! the C++ original does purely to keep one concrete class — `Fingerprint<T>`
//! stays generic, which avoids the `unsafe` pointer-erasure games the C++
//! control-block trick would otherwise require in Rust. See `DESIGN.md`.
//!
//! # Safety contract (carried over verbatim from the original design)
//!
//! A `Fingerprint` does not keep its payload alive and does not affect
//! [`crate::node::Node::unique`]. It is safe to use against payloads that are
//! known never to be edited in place — in practice, payloads reachable only
//! through a transaction's restore slot, or through an already-published,
//! immutable [`crate::detached::Detached`]. For a node that might still be
//! uniquely owned and edited in place, `write()` mutates the payload's
//! contents without changing its identity, so `is_same_as` can return `true`
//! even though the content has changed. For those cases prefer
//! application-level identity (a revision counter, a hash) over a
//! `Fingerprint`. This is a documented limitation, not a bug.

use std::sync::{Arc, Weak};

use crate::detached::{Detached, OptDetached};
use crate::node::{Node, OptNode};

/// A non-owning weak observation of a payload's identity.
pub struct Fingerprint<T> {
    weak: Weak<T>,
}

impl<T> Fingerprint<T> {
    /// An empty fingerprint that is never `is_same_as` any live handle.
    pub fn empty() -> Self {
        Fingerprint { weak: Weak::new() }
    }

    pub(crate) fn from_arc(arc: &Arc<T>) -> Self {
        Fingerprint { weak: Arc::downgrade(arc) }
    }

    /// Creates a fingerprint of a [`Node`]'s current payload.
    pub fn of_node(node: &Node<T>) -> Self {
        Self::from_arc(node.payload_arc())
    }

    /// Creates a fingerprint of an [`OptNode`]'s payload, or an empty
    /// fingerprint if the node is empty.
    pub fn of_opt_node(node: &OptNode<T>) -> Self {
        match node.payload_arc() {
            Some(arc) => Self::from_arc(arc),
            None => Self::empty(),
        }
    }

    /// Creates a fingerprint of a [`Detached`]'s payload.
    pub fn of_detached(detached: &Detached<T>) -> Self {
        Self::from_arc(detached.payload_arc())
    }

    /// Creates a fingerprint of an [`OptDetached`]'s payload, or an empty
    /// fingerprint if it is empty.
    pub fn of_opt_detached(detached: &OptDetached<T>) -> Self {
        match detached.payload_arc() {
            Some(arc) => Self::from_arc(arc),
            None => Self::empty(),
        }
    }

    /// Resets this fingerprint to the empty state.
    pub fn reset(&mut self) {
        self.weak = Weak::new();
    }

    /// Whether this fingerprint was ever bound to a live payload (does not
    /// imply the payload is still alive — use [`Self::is_dangling`] for
    /// that).
    pub fn is_empty(&self) -> bool {
        self.weak.strong_count() == 0 && self.weak.weak_count() == 0
    }

    /// Whether the observed payload has since been freed.
    pub fn is_dangling(&self) -> bool {
        !self.is_empty() && self.weak.strong_count() == 0
    }

    /// Identity comparison against another fingerprint.
    pub fn is_same_as(&self, other: &Fingerprint<T>) -> bool {
        self.weak.ptr_eq(&other.weak)
    }

    /// Identity comparison against a live [`Node`].
    pub fn is_same_as_node(&self, node: &Node<T>) -> bool {
        std::ptr::eq(self.weak.as_ptr(), Arc::as_ptr(node.payload_arc()))
    }

    /// Identity comparison against a live [`Detached`].
    pub fn is_same_as_detached(&self, detached: &Detached<T>) -> bool {
        std::ptr::eq(self.weak.as_ptr(), Arc::as_ptr(detached.payload_arc()))
    }
}

impl<T> Clone for Fingerprint<T> {
    fn clone(&self) -> Self {
        Fingerprint { weak: self.weak.clone() }
    }
}

impl<T> Default for Fingerprint<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> std::fmt::Debug for Fingerprint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fingerprint")
            .field("dangling", &self.is_dangling())
            .finish()
    }
}
