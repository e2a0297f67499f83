//! Weak-reference observer list with dead-subscriber reclamation.
//!
//! Ported from `kuzco::Publisher<T>` / `kuzco::Subscriber<T>`
//! (`pubsub/Publisher.hpp`, `pubsub/Subscriber.hpp`, `pubsub/PubSub.inl`). The
//! original registers a raw member-function pointer alongside a
//! `weak_ptr<void>` "owner" token so it can tell a dead subscriber from a
//! live one without the subscriber base class needing a virtual destructor
//! hook; Rust's `Weak<dyn Subscriber<T>>` already carries both the liveness
//! check and the dispatch target in one handle, so that split collapses into
//! a single field here.
//!
//! Two separate locks guard the subscriber list (spec.md §4.6): one over the
//! `Vec` itself, held only briefly by `add_subscriber`/`remove_subscriber`
//! and by [`Publisher::notify_subscribers`] while it snapshots or reclaims,
//! never while a subscriber's `on_changed` is actually running; and one held
//! for the whole duration of a notification pass, so a *caller* that wants
//! to guarantee a subscriber can't still be running inside a callback after
//! unregistering (e.g. right before dropping it) can ask for that with
//! [`Publisher::remove_subscriber_sync`]. This is what keeps registration and
//! removal cheap and non-blocking even while a notification is in flight.

use std::sync::{Arc, Weak};

use crate::sync::Mutex;

/// Receives change notifications from a [`Publisher`].
///
/// Implementors are held only weakly by the publisher — once every `Arc` to
/// a subscriber is dropped, the publisher silently stops calling it and
/// reclaims its slot on the next notification pass.
pub trait Subscriber<T>: Send + Sync {
    /// Called with the new state on every [`Publisher::notify_subscribers`]
    /// while this subscriber is still alive.
    fn on_changed(&self, state: &T);
}

/// A broadcaster of state-changed events to a weakly-held set of
/// [`Subscriber`]s.
pub struct Publisher<T> {
    subscribers: Mutex<Vec<Weak<dyn Subscriber<T>>>>,
    notifying: Mutex<()>,
}

impl<T> Publisher<T> {
    /// Constructs a publisher with no subscribers.
    pub fn new() -> Self {
        Publisher { subscribers: Mutex::new(Vec::new()), notifying: Mutex::new(()) }
    }

    /// Registers a subscriber. The publisher does not keep it alive — the
    /// caller must hold its own `Arc` for as long as it wants notifications.
    pub fn add_subscriber(&self, subscriber: &Arc<dyn Subscriber<T>>) {
        let mut subs = self.lock_subscribers();
        subs.push(Arc::downgrade(subscriber));
        log::trace!("publisher: subscriber added ({} total)", subs.len());
    }

    /// Unregisters a subscriber by identity. A no-op if it was never
    /// registered or has already been reclaimed.
    ///
    /// This does not wait for an in-progress [`Self::notify_subscribers`]
    /// call to finish; the subscriber's `on_changed` may still be running on
    /// another thread when this returns. Use
    /// [`Self::remove_subscriber_sync`] when that must not happen.
    pub fn remove_subscriber(&self, subscriber: &Arc<dyn Subscriber<T>>) {
        let target = Arc::downgrade(subscriber);
        self.lock_subscribers().retain(|w| !w.ptr_eq(&target));
    }

    /// Unregisters a subscriber and blocks until any notification pass
    /// already in progress has completed, guaranteeing `on_changed` will
    /// never be called again once this returns. Use this before dropping the
    /// last strong reference to a subscriber that must not observe a
    /// use-after-teardown callback.
    pub fn remove_subscriber_sync(&self, subscriber: &Arc<dyn Subscriber<T>>) {
        let _notify_guard = self.lock_notifying();
        self.remove_subscriber(subscriber);
    }

    /// Calls every live subscriber's `on_changed` with `state`, then drops
    /// any slot whose subscriber has been deallocated.
    ///
    /// Subscribers are notified in registration order. A subscriber that
    /// panics unwinds out of this call without notifying the rest — callers
    /// that need isolation between subscribers should catch panics inside
    /// their own `on_changed`.
    ///
    /// The subscribers list is only briefly locked, twice — once to snapshot
    /// it and once to reclaim dead slots afterward — so `add_subscriber`,
    /// `remove_subscriber`, and `subscriber_count` never block for the
    /// duration of a notification pass (spec.md §4.6, §5). Only the
    /// `notifying` lock is held throughout, which is what
    /// `remove_subscriber_sync` waits on.
    pub fn notify_subscribers(&self, state: &T) {
        let _notify_guard = self.lock_notifying();
        let snapshot: Vec<Weak<dyn Subscriber<T>>> = self.lock_subscribers().clone();

        let mut any_dead = false;
        for weak in &snapshot {
            match weak.upgrade() {
                Some(subscriber) => subscriber.on_changed(state),
                None => any_dead = true,
            }
        }

        if any_dead {
            let mut subs = self.lock_subscribers();
            let before = subs.len();
            subs.retain(|weak| weak.upgrade().is_some());
            let reclaimed = before - subs.len();
            if reclaimed > 0 {
                log::debug!("publisher: reclaimed {reclaimed} dead subscriber(s)");
            }
        }
    }

    /// The number of subscriber slots, including any not yet reclaimed dead
    /// ones. Mainly useful for tests and diagnostics.
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn lock_subscribers(&self) -> crate::sync::MutexGuard<'_, Vec<Weak<dyn Subscriber<T>>>> {
        self.subscribers.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_notifying(&self) -> crate::sync::MutexGuard<'_, ()> {
        self.notifying.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher").field("subscribers", &self.subscriber_count()).finish()
    }
}
