//! Mutable, COW-discipline handles to a single tree element.
//!
//! Ported from `kuzco::Node<T>` / `kuzco::OptNode<T>` (`Node.hpp`). See
//! `DESIGN.md` for how the copy-on-write algorithm and "shallow copy only"
//! contract described in spec.md §4.1 map onto `Arc`.

use std::sync::Arc;

use crate::detached::{Detached, OptDetached};
use crate::fingerprint::Fingerprint;
use crate::payload::Payload;

/// An owning, mutable handle to one tree element with copy-on-write
/// semantics.
///
/// A `Node<T>` is never empty — see [`OptNode`] for the nullable sibling.
/// Cloning is intentionally not implemented; use [`Node::share`] for an
/// explicit shallow share, or [`Node::replace`]/assignment for reassigning
/// the value in place. See the module docs and spec.md §4.1 for why
/// copy-assignment is deliberately absent.
pub struct Node<T> {
    payload: Payload<T>,
}

impl<T> Node<T> {
    /// Constructs a brand-new, uniquely-owned node.
    pub fn new(value: T) -> Self {
        Node { payload: Payload::new(value) }
    }

    /// Reads the current value without ever triggering copy-on-write.
    pub fn read(&self) -> &T {
        self.payload.get()
    }

    /// Reports whether this handle currently holds the only strong
    /// reference to its payload — i.e. whether [`Self::write`] can mutate in
    /// place without allocating.
    pub fn unique(&self) -> bool {
        self.payload.unique()
    }

    /// Returns a mutable reference to the value, cloning the payload first
    /// if it is shared with any other handle.
    ///
    /// Postcondition (spec.md §8, "COW precondition"): after this returns,
    /// `self.unique()` is `true`.
    pub fn write(&mut self) -> &mut T
    where
        T: Clone,
    {
        if !self.payload.unique() {
            self.payload = Payload::new((*self.payload.get()).clone());
        }
        self.payload.get_mut().expect("payload made unique above")
    }

    /// Assigns a new value: mutates in place if unique, otherwise allocates
    /// a fresh payload and rebinds.
    pub fn replace(&mut self, value: T) {
        if self.payload.unique() {
            if let Some(slot) = self.payload.get_mut() {
                *slot = value;
                return;
            }
        }
        self.payload = Payload::new(value);
    }

    /// Acquires an immutable snapshot sharing this node's current payload.
    pub fn detach(&self) -> Detached<T> {
        Detached::from_arc(Arc::clone(self.payload.arc()))
    }

    /// A weak, non-owning identity token for the current payload.
    pub fn fingerprint(&self) -> Fingerprint<T> {
        Fingerprint::of_node(self)
    }

    /// Explicit shallow share: the returned node observes the same payload
    /// until either handle writes, at which point both become (or one
    /// becomes) non-unique and the other's next write copies.
    ///
    /// This is the Rust equivalent of the original's copy constructor, kept
    /// as a named method instead of a `Clone` impl so call sites can't
    /// mistake it for a deep copy.
    pub fn share(&self) -> Node<T> {
        Node { payload: self.payload.clone() }
    }

    pub(crate) fn payload_arc(&self) -> &Arc<T> {
        self.payload.arc()
    }

    pub(crate) fn from_payload(payload: Payload<T>) -> Self {
        Node { payload }
    }

    pub(crate) fn payload(&self) -> &Payload<T> {
        &self.payload
    }

    pub(crate) fn set_payload(&mut self, payload: Payload<T>) {
        self.payload = payload;
    }
}

impl<T: Clone> From<&Detached<T>> for Node<T> {
    /// Cross-state exchange: builds a brand-new, uniquely-owned node from a
    /// detached snapshot by cloning its element, rather than sharing the
    /// payload. Use this (not [`Node::share`]) when moving a subtree
    /// observed from one state container into a transaction on another —
    /// sharing the `Arc` across independent containers would let a write in
    /// one container silently mutate what the other container considers its
    /// own unique payload. See spec.md §8 scenario 6.
    fn from(detached: &Detached<T>) -> Self {
        Node::new(detached.get().clone())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Node").field(self.read()).finish()
    }
}

/// The nullable sibling of [`Node`].
pub struct OptNode<T> {
    payload: Option<Payload<T>>,
}

impl<T> OptNode<T> {
    /// The empty state.
    pub fn empty() -> Self {
        OptNode { payload: None }
    }

    /// Wraps a value as a non-empty optional node.
    pub fn new(value: T) -> Self {
        OptNode { payload: Some(Payload::new(value)) }
    }

    /// Whether this holds a value.
    pub fn is_some(&self) -> bool {
        self.payload.is_some()
    }

    /// Whether this is empty.
    pub fn is_none(&self) -> bool {
        self.payload.is_none()
    }

    /// Clears the node back to empty.
    pub fn reset(&mut self) {
        self.payload = None;
    }

    /// Reads the value without triggering COW. Returns `None` if empty.
    pub fn read(&self) -> Option<&T> {
        self.payload.as_ref().map(Payload::get)
    }

    /// Reports uniqueness; an empty node is trivially considered unique.
    pub fn unique(&self) -> bool {
        self.payload.as_ref().map_or(true, Payload::unique)
    }

    /// Mutable access with copy-on-write. Panics if empty — per spec.md §7,
    /// `write()` on an empty `OptNode` is a programmer-contract violation,
    /// not a recoverable error.
    pub fn write(&mut self) -> &mut T
    where
        T: Clone,
    {
        let payload = self
            .payload
            .as_mut()
            .expect("OptNode::write called on an empty node");
        if !payload.unique() {
            *payload = Payload::new((*payload.get()).clone());
        }
        payload.get_mut().expect("payload made unique above")
    }

    /// Assigns a new value, constructing the payload if currently empty.
    pub fn replace(&mut self, value: T) {
        match &mut self.payload {
            Some(payload) if payload.unique() => {
                if let Some(slot) = payload.get_mut() {
                    *slot = value;
                    return;
                }
                self.payload = Some(Payload::new(value));
            }
            _ => self.payload = Some(Payload::new(value)),
        }
    }

    /// Acquires an immutable, possibly-empty snapshot.
    pub fn detach(&self) -> OptDetached<T> {
        match &self.payload {
            Some(payload) => OptDetached::from_arc(Some(Arc::clone(payload.arc()))),
            None => OptDetached::from_arc(None),
        }
    }

    /// A weak identity token; empty if this node is empty.
    pub fn fingerprint(&self) -> Fingerprint<T> {
        Fingerprint::of_opt_node(self)
    }

    /// Explicit shallow share, mirroring [`Node::share`].
    pub fn share(&self) -> OptNode<T> {
        OptNode { payload: self.payload.clone() }
    }

    pub(crate) fn payload_arc(&self) -> Option<&Arc<T>> {
        self.payload.as_ref().map(Payload::arc)
    }
}

impl<T> From<Node<T>> for OptNode<T> {
    fn from(node: Node<T>) -> Self {
        OptNode { payload: Some(node.payload) }
    }
}

impl<T: Clone> From<&OptDetached<T>> for OptNode<T> {
    /// Cross-state exchange for the nullable sibling, see
    /// `Node::from(&Detached<T>)`.
    fn from(detached: &OptDetached<T>) -> Self {
        match detached.get() {
            Some(value) => OptNode::new(value.clone()),
            None => OptNode::empty(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for OptNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OptNode").field(&self.read()).finish()
    }
}
