//! COW-discipline variable-length sequences.
//!
//! Ported from `kuzco::NodeVector<T>` / `kuzco::Vector<T>` (`NodeVector.hpp`,
//! `Vector.hpp`), which both specialize a shared `VectorImpl<WrappedVector>`
//! base. Rust has no analogue of `WrappedVector`'s template-template
//! parameter (the original lets you swap in e.g. `boost::small_vector`); this
//! crate concretely backs both on `std::vec::Vec`, so the shared logic below
//! lives in the private `CowVec<E>` helper instead of a public base class —
//! see `DESIGN.md` for this simplification.
//!
//! `NodeVector<T>`'s elements are themselves [`Node<T>`], so cloning its
//! backing storage shares children rather than deep-copying them (spec.md
//! §4.4: "a vector clone is shallow in the children"). `Vector<T>` holds
//! plain `T` and is the type spec.md says NodeVector exists precisely so
//! callers never have to put a `Node` in a plain `Vector` (which would defeat
//! COW: a `Node` cloned by `Vec::clone`'s derive would have no `Clone` impl
//! to call in the first place — see `node.rs`).

use crate::node::Node;
use crate::payload::Payload;
use crate::transaction::NodeRef;

/// Shared copy-on-write vector core. Not part of the public API; both
/// [`NodeVector`] and [`Vector`] are thin wrappers around one of these.
struct CowVec<E> {
    payload: Payload<Vec<E>>,
    /// How to produce an independent copy of one element when the backing
    /// storage must be duplicated. For `Vector<T>` this is `T::clone`; for
    /// `NodeVector<T>` this is `Node::share` — a shallow share, not a deep
    /// copy of the child's element. Storing it as a plain fn pointer (rather
    /// than requiring `E: Clone`) is what lets `NodeVector<T>` avoid ever
    /// requiring `T: Clone` at the vector level.
    dup: fn(&E) -> E,
}

impl<E> CowVec<E> {
    fn new(items: Vec<E>, dup: fn(&E) -> E) -> Self {
        CowVec { payload: Payload::new(items), dup }
    }

    fn unique(&self) -> bool {
        self.payload.unique()
    }

    fn ensure_unique(&mut self) {
        if !self.payload.unique() {
            let dup = self.dup;
            let copy: Vec<E> = self.payload.get().iter().map(|e| dup(e)).collect();
            self.payload = Payload::new(copy);
        }
    }

    fn as_slice(&self) -> &[E] {
        self.payload.get()
    }

    fn shallow_clone(&self) -> Self {
        CowVec { payload: self.payload.clone(), dup: self.dup }
    }

    fn modify(&mut self, index: usize) -> &mut E {
        self.ensure_unique();
        &mut self.payload.get_mut().expect("unique after ensure_unique")[index]
    }

    fn find_if(&mut self, pred: impl Fn(&E) -> bool) -> Option<&mut E> {
        self.ensure_unique();
        self.payload
            .get_mut()
            .expect("unique after ensure_unique")
            .iter_mut()
            .find(|e| pred(e))
    }

    fn push_back(&mut self, value: E) {
        self.ensure_unique();
        self.payload.get_mut().expect("unique after ensure_unique").push(value);
    }

    fn pop_back(&mut self) {
        self.ensure_unique();
        self.payload.get_mut().expect("unique after ensure_unique").pop();
    }

    /// Strong exception guarantee (spec.md §4.4): builds the new storage
    /// fully before replacing `self.payload`, so a panic partway through
    /// leaves the original vector untouched.
    fn insert(&mut self, index: usize, value: E) {
        let len = self.as_slice().len();
        assert!(index <= len, "insert index {index} out of bounds (len {len})");
        if self.unique() {
            self.payload.get_mut().expect("unique").insert(index, value);
            return;
        }
        let dup = self.dup;
        let old = self.as_slice();
        let mut fresh = Vec::with_capacity(len + 1);
        fresh.extend(old[..index].iter().map(|e| dup(e)));
        fresh.push(value);
        fresh.extend(old[index..].iter().map(|e| dup(e)));
        self.payload = Payload::new(fresh);
    }

    fn erase(&mut self, range: std::ops::Range<usize>) {
        let len = self.as_slice().len();
        assert!(range.end <= len, "erase range {range:?} out of bounds (len {len})");
        if self.unique() {
            self.payload.get_mut().expect("unique").drain(range);
            return;
        }
        let dup = self.dup;
        let old = self.as_slice();
        let mut fresh = Vec::with_capacity(len - (range.end - range.start));
        fresh.extend(old[..range.start].iter().map(|e| dup(e)));
        fresh.extend(old[range.end..].iter().map(|e| dup(e)));
        self.payload = Payload::new(fresh);
    }

    /// `reserve(c)`: a no-op (identity-preserving) on a shared vector whose
    /// capacity is already `>= c` (spec.md §4.4 algorithmic notes).
    fn reserve(&mut self, total_capacity: usize) {
        if !self.unique() {
            if self.as_slice().capacity() >= total_capacity {
                return;
            }
            let dup = self.dup;
            let mut fresh = Vec::with_capacity(total_capacity);
            fresh.extend(self.as_slice().iter().map(|e| dup(e)));
            self.payload = Payload::new(fresh);
            return;
        }
        let vec = self.payload.get_mut().expect("unique");
        let additional = total_capacity.saturating_sub(vec.len());
        if vec.capacity() < total_capacity {
            vec.reserve(additional);
        }
    }

    fn clear(&mut self) {
        if self.unique() {
            self.payload.get_mut().expect("unique").clear();
        } else {
            self.payload = Payload::new(Vec::new());
        }
    }

    fn assign(&mut self, items: Vec<E>) {
        if self.unique() {
            *self.payload.get_mut().expect("unique") = items;
        } else {
            self.payload = Payload::new(items);
        }
    }

    /// Growing resize that fills the tail by repeatedly duplicating `fill`
    /// (spec.md: "growing allocates fresh storage and default-constructs the
    /// tail" — here "default" is supplied by the caller since `E` need not
    /// implement `Default`, e.g. `Node<T>` never does).
    fn resize_with(&mut self, count: usize, fill: &E) {
        let len = self.as_slice().len();
        if len == count {
            return; // identity preserved
        }
        let dup = self.dup;
        if self.unique() {
            let vec = self.payload.get_mut().expect("unique");
            if count < len {
                vec.truncate(count);
            } else {
                vec.extend((len..count).map(|_| dup(fill)));
            }
            return;
        }
        if count < len {
            let fresh: Vec<E> = self.as_slice()[..count].iter().map(|e| dup(e)).collect();
            self.payload = Payload::new(fresh);
        } else {
            let mut fresh: Vec<E> = Vec::with_capacity(count);
            fresh.extend(self.as_slice().iter().map(|e| dup(e)));
            fresh.extend((len..count).map(|_| dup(fill)));
            self.payload = Payload::new(fresh);
        }
    }
}

/// A COW-discipline sequence whose elements are themselves [`Node`]s.
///
/// Use this, not [`Vector`], whenever elements need their own independent
/// copy-on-write lifecycle — spec.md §4.4 calls mixing the two "unsafe",
/// since a plain `Vector<Node<T>>` would have no way to clone a `Node` when
/// the vector's own storage needs duplicating (`Node` has no `Clone` impl by
/// design, see `node.rs`).
pub struct NodeVector<T> {
    core: CowVec<Node<T>>,
}

impl<T> NodeVector<T> {
    /// Builds a node vector from already-constructed nodes.
    pub fn from_nodes(nodes: Vec<Node<T>>) -> Self {
        NodeVector { core: CowVec::new(nodes, Node::share) }
    }

    /// Builds an empty node vector.
    pub fn new() -> Self {
        NodeVector { core: CowVec::new(Vec::new(), Node::share) }
    }

    pub fn len(&self) -> usize {
        self.core.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.as_slice().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.core.as_slice().capacity()
    }

    /// Read-only access to a child. Never triggers COW.
    pub fn get(&self, index: usize) -> Option<&Node<T>> {
        self.core.as_slice().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node<T>> {
        self.core.as_slice().iter()
    }

    /// Mutable access to a child, cloning the backing storage first if it is
    /// shared with another `NodeVector` handle. The returned `Node` is
    /// itself still COW — call `.write()` on it to edit its element.
    pub fn modify(&mut self, index: usize) -> &mut Node<T> {
        self.core.modify(index)
    }

    /// Returns the first child matching `predicate`, as a scoped
    /// [`NodeRef`] ready for `.write()`, without requiring the caller to
    /// know its index.
    pub fn find_if(&mut self, predicate: impl Fn(&T) -> bool) -> NodeRef<'_, T> {
        match self.core.find_if(|n| predicate(n.read())) {
            Some(node) => NodeRef::some(node),
            None => NodeRef::none(),
        }
    }

    pub fn push_back(&mut self, value: Node<T>) {
        self.core.push_back(value);
    }

    pub fn pop_back(&mut self) {
        self.core.pop_back();
    }

    pub fn insert(&mut self, index: usize, value: Node<T>) {
        self.core.insert(index, value);
    }

    pub fn erase(&mut self, index: usize) {
        self.core.erase(index..index + 1);
    }

    pub fn erase_range(&mut self, range: std::ops::Range<usize>) {
        self.core.erase(range);
    }

    pub fn reserve(&mut self, capacity: usize) {
        self.core.reserve(capacity);
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    /// Shrinks by truncation, or grows by appending independent shares of
    /// `fill`.
    pub fn resize_with(&mut self, count: usize, fill: &Node<T>) {
        self.core.resize_with(count, fill);
    }
}

impl<T> Default for NodeVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NodeVector<T> {
    /// Shallow share: bumps the backing storage's refcount. The first
    /// structural mutation on either handle afterwards clones the storage,
    /// producing fresh shares of each child (spec.md §8 scenario 4).
    fn clone(&self) -> Self {
        NodeVector { core: self.core.shallow_clone() }
    }
}

impl<T> std::ops::Index<usize> for NodeVector<T> {
    type Output = Node<T>;
    fn index(&self, index: usize) -> &Node<T> {
        &self.core.as_slice()[index]
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for NodeVector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(Node::read)).finish()
    }
}

/// A COW-discipline sequence of plain values.
///
/// See [`NodeVector`] for the sibling type to use when elements need their
/// own nested COW lifecycle. `Vector<T>` must not be instantiated with
/// `T = Node<U>` — use `NodeVector<U>` instead (spec.md §4.4).
pub struct Vector<T: Clone> {
    core: CowVec<T>,
}

impl<T: Clone> Vector<T> {
    pub fn from_values(values: Vec<T>) -> Self {
        Vector { core: CowVec::new(values, Clone::clone) }
    }

    pub fn new() -> Self {
        Vector { core: CowVec::new(Vec::new(), Clone::clone) }
    }

    pub fn len(&self) -> usize {
        self.core.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.as_slice().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.core.as_slice().capacity()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.core.as_slice().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.core.as_slice().iter()
    }

    /// Mutable access to an element, cloning the backing storage first if it
    /// is shared with another `Vector` handle.
    pub fn modify(&mut self, index: usize) -> &mut T {
        self.core.modify(index)
    }

    pub fn find_if(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.core.find_if(predicate)
    }

    pub fn push_back(&mut self, value: T) {
        self.core.push_back(value);
    }

    pub fn pop_back(&mut self) {
        self.core.pop_back();
    }

    pub fn insert(&mut self, index: usize, value: T) {
        self.core.insert(index, value);
    }

    pub fn erase(&mut self, index: usize) {
        self.core.erase(index..index + 1);
    }

    pub fn erase_range(&mut self, range: std::ops::Range<usize>) {
        self.core.erase(range);
    }

    pub fn reserve(&mut self, capacity: usize) {
        self.core.reserve(capacity);
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    pub fn resize(&mut self, count: usize, fill: T) {
        self.core.resize_with(count, &fill);
    }
}

impl<T: Clone> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    /// Shallow share, see [`NodeVector::clone`].
    fn clone(&self) -> Self {
        Vector { core: self.core.shallow_clone() }
    }
}

impl<T: Clone> std::ops::Index<usize> for Vector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.core.as_slice()[index]
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
