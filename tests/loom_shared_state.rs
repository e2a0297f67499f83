//! Model-checks the writer/reader protocol in `shared_state.rs` under
//! `loom`. Run with:
//!
//! ```text
//! RUSTFLAGS="--cfg loom" cargo test --test loom_shared_state --release
//! ```
#![cfg(loom)]

use std::sync::Arc;

use treecow::{Node, SharedState};

#[derive(Clone)]
struct Counter {
    value: i32,
}

#[test]
fn a_snapshot_never_observes_a_torn_commit() {
    loom::model(|| {
        let state = Arc::new(SharedState::new(Node::new(Counter { value: 0 })));

        let writer = {
            let state = Arc::clone(&state);
            loom::thread::spawn(move || {
                let mut tx = state.begin_transaction();
                tx.value = 1;
            })
        };

        // A snapshot taken concurrently with the commit above must observe
        // either the pre- or post-commit value, never a partially
        // constructed one.
        let observed = state.snapshot().value;
        assert!(observed == 0 || observed == 1);

        writer.join().unwrap();
        assert_eq!(state.snapshot().value, 1);
    });
}

#[test]
fn a_dropped_transaction_during_unwind_aborts_not_commits() {
    loom::model(|| {
        let state = SharedState::new(Node::new(Counter { value: 0 }));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut tx = state.begin_transaction();
            tx.value = 99;
            panic!("simulated writer failure");
        }));

        assert!(result.is_err());
        assert_eq!(state.snapshot().value, 0);
    });
}
