//! Scenarios 2, 3, 6 (spec.md §8): reader isolation, abort preserves state,
//! cross-state-container exchange.

use treecow::{Node, SharedState};

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    value: i32,
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn readers_observe_a_consistent_snapshot_across_a_commit() {
    init_logging();
    let state = SharedState::new(Node::new(Counter { value: 0 }));

    let before = state.snapshot();
    assert_eq!(before.value, 0);

    {
        let mut tx = state.begin_transaction();
        tx.value = 1;
    } // commits on drop

    let after = state.snapshot();
    assert_eq!(after.value, 1);
    // the earlier snapshot is untouched by the later commit.
    assert_eq!(before.value, 0);
}

#[test]
fn abort_preserves_the_previously_published_state() {
    let state = SharedState::new(Node::new(Counter { value: 0 }));

    {
        let mut tx = state.begin_transaction();
        tx.value = 99;
        tx.abort();
    }

    assert_eq!(state.snapshot().value, 0);
}

#[test]
fn explicit_commit_reports_whether_the_root_changed() {
    let state = SharedState::new(Node::new(Counter { value: 5 }));

    let mut tx = state.begin_transaction();
    let (_snapshot, changed) = tx.commit();
    assert!(!changed, "no edit happened, so commit should report no change");
    drop(tx);

    let mut tx = state.begin_transaction();
    tx.value += 1;
    let (snapshot, changed) = tx.commit();
    assert!(changed);
    assert_eq!(snapshot.value, 6);
}

#[test]
fn only_one_writer_transaction_is_open_at_a_time() {
    let state = std::sync::Arc::new(SharedState::new(Node::new(Counter { value: 0 })));
    let tx = state.begin_transaction();

    let state_clone = std::sync::Arc::clone(&state);
    let handle = std::thread::spawn(move || {
        // Blocks until the first transaction (held by the main thread) drops.
        let mut tx = state_clone.begin_transaction();
        tx.value = 7;
    });

    std::thread::sleep(std::time::Duration::from_millis(20));
    drop(tx); // releases the writer lock, committing no-op edits

    handle.join().unwrap();
    assert_eq!(state.snapshot().value, 7);
}

#[test]
fn detached_snapshot_can_seed_a_node_in_another_state_container() {
    let source = SharedState::new(Node::new(Counter { value: 3 }));
    let snapshot = source.snapshot();

    let destination = SharedState::new(Node::from(&snapshot));
    assert_eq!(destination.snapshot().value, 3);

    // Editing the destination must not perturb the source's published root.
    {
        let mut tx = destination.begin_transaction();
        tx.value = 100;
    }
    assert_eq!(destination.snapshot().value, 100);
    assert_eq!(source.snapshot().value, 3);
}
