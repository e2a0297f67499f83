//! Immutable, shareable snapshot handles.
//!
//! Ported from `kuzco::Detached<T>` / `kuzco::OptDetached<T>` (`Detached.hpp`).
//! `Detached<T>` is the only handle in the crate callers may hold across
//! threads without further coordination (spec.md §4.2) — it owns a strong
//! `Arc<T>` reference to an immutable payload, so sharing it is just sharing
//! the `Arc`.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::ContractError;
use crate::fingerprint::Fingerprint;

/// An immutable, non-null, shared snapshot of a payload.
///
/// Equality and ordering are by payload identity (pointer address), not by
/// value — spec.md §4.2 calls this out explicitly so `Detached<T>` can be
/// used as a map key without requiring `T: Ord`.
pub struct Detached<T> {
    arc: Arc<T>,
}

impl<T> Detached<T> {
    pub(crate) fn from_arc(arc: Arc<T>) -> Self {
        Detached { arc }
    }

    /// Reads the snapshotted value.
    pub fn get(&self) -> &T {
        &self.arc
    }

    /// A weak identity token for this snapshot's payload.
    pub fn fingerprint(&self) -> Fingerprint<T> {
        Fingerprint::of_detached(self)
    }

    pub(crate) fn payload_arc(&self) -> &Arc<T> {
        &self.arc
    }
}

impl<T> Clone for Detached<T> {
    fn clone(&self) -> Self {
        Detached { arc: Arc::clone(&self.arc) }
    }
}

impl<T> std::ops::Deref for Detached<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.arc
    }
}

impl<T> PartialEq for Detached<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.arc, &other.arc)
    }
}
impl<T> Eq for Detached<T> {}

impl<T> PartialOrd for Detached<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Detached<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        Arc::as_ptr(&self.arc).cmp(&Arc::as_ptr(&other.arc))
    }
}

impl<T> std::hash::Hash for Detached<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.arc).hash(state);
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Detached<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Detached").field(self.get()).finish()
    }
}

/// The nullable sibling of [`Detached`].
pub struct OptDetached<T> {
    arc: Option<Arc<T>>,
}

impl<T> OptDetached<T> {
    pub(crate) fn from_arc(arc: Option<Arc<T>>) -> Self {
        OptDetached { arc }
    }

    /// The empty state.
    pub fn empty() -> Self {
        OptDetached { arc: None }
    }

    /// Whether this holds a value.
    pub fn is_some(&self) -> bool {
        self.arc.is_some()
    }

    /// Whether this is empty.
    pub fn is_none(&self) -> bool {
        self.arc.is_none()
    }

    /// Reads the snapshotted value, if any.
    pub fn get(&self) -> Option<&T> {
        self.arc.as_deref()
    }

    /// A weak identity token; empty if this snapshot is empty.
    pub fn fingerprint(&self) -> Fingerprint<T> {
        Fingerprint::of_opt_detached(self)
    }

    pub(crate) fn payload_arc(&self) -> Option<&Arc<T>> {
        self.arc.as_ref()
    }
}

impl<T> Clone for OptDetached<T> {
    fn clone(&self) -> Self {
        OptDetached { arc: self.arc.clone() }
    }
}

impl<T> From<Detached<T>> for OptDetached<T> {
    fn from(d: Detached<T>) -> Self {
        OptDetached { arc: Some(d.arc) }
    }
}

impl<T> TryFrom<OptDetached<T>> for Detached<T> {
    type Error = ContractError;

    /// Constructs a non-null handle from a possibly-empty one. Per spec.md
    /// §7 this is the crate's one `Result`-surfaced fallibility point —
    /// everything else is a panic.
    fn try_from(opt: OptDetached<T>) -> Result<Self, Self::Error> {
        opt.arc.map(Detached::from_arc).ok_or(ContractError::EmptyOptional)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for OptDetached<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OptDetached").field(&self.get()).finish()
    }
}
