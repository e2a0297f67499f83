//! Scenario 5 (spec.md §8): dead subscriber reclamation.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use treecow::{Publisher, Subscriber};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Recorder {
    last_seen: AtomicI32,
    calls: AtomicI32,
}

impl Recorder {
    fn new() -> Self {
        Recorder { last_seen: AtomicI32::new(-1), calls: AtomicI32::new(0) }
    }
}

impl Subscriber<i32> for Recorder {
    fn on_changed(&self, state: &i32) {
        self.last_seen.store(*state, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn live_subscribers_are_notified() {
    let publisher: Publisher<i32> = Publisher::new();
    let a = Arc::new(Recorder::new());
    let a_dyn: Arc<dyn Subscriber<i32>> = a.clone();
    publisher.add_subscriber(&a_dyn);

    publisher.notify_subscribers(&42);

    assert_eq!(a.last_seen.load(Ordering::SeqCst), 42);
}

#[test]
fn dropping_a_subscriber_reclaims_its_slot_on_next_notify() {
    init_logging();
    let publisher: Publisher<i32> = Publisher::new();
    let kept = Arc::new(Recorder::new());
    let kept_dyn: Arc<dyn Subscriber<i32>> = kept.clone();
    publisher.add_subscriber(&kept_dyn);

    {
        let transient: Arc<dyn Subscriber<i32>> = Arc::new(Recorder::new());
        publisher.add_subscriber(&transient);
        assert_eq!(publisher.subscriber_count(), 2);
    } // `transient`'s only strong reference is dropped here

    publisher.notify_subscribers(&7);
    assert_eq!(publisher.subscriber_count(), 1, "the dead slot should be reclaimed");
    assert_eq!(kept.last_seen.load(Ordering::SeqCst), 7);
}

#[test]
fn explicit_remove_stops_future_notifications() {
    let publisher: Publisher<i32> = Publisher::new();
    let sub = Arc::new(Recorder::new());
    let sub_dyn: Arc<dyn Subscriber<i32>> = sub.clone();
    publisher.add_subscriber(&sub_dyn);
    publisher.notify_subscribers(&1);

    publisher.remove_subscriber(&sub_dyn);
    publisher.notify_subscribers(&2);

    assert_eq!(sub.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn remove_subscriber_sync_leaves_no_subscribers_registered() {
    let publisher: Publisher<i32> = Publisher::new();
    let sub: Arc<dyn Subscriber<i32>> = Arc::new(Recorder::new());
    publisher.add_subscriber(&sub);
    publisher.remove_subscriber_sync(&sub);
    assert_eq!(publisher.subscriber_count(), 0);
}
