//! Commit throughput as a function of tree depth.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use treecow::{Node, SharedState};

#[derive(Clone)]
struct Chain {
    value: i32,
    next: Option<Box<Chain>>,
}

fn chain(depth: usize) -> Chain {
    let mut node = Chain { value: 0, next: None };
    for _ in 0..depth {
        node = Chain { value: 0, next: Some(Box::new(node)) };
    }
    node
}

fn deepest_mut(chain: &mut Chain) -> &mut i32 {
    let mut current = chain;
    while let Some(next) = current.next.as_mut() {
        current = next;
    }
    &mut current.value
}

fn bench_commit_by_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_state_commit");
    for depth in [1usize, 16, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let state = SharedState::new(Node::new(chain(depth)));
            b.iter(|| {
                let mut tx = state.begin_transaction();
                *deepest_mut(&mut tx) += 1;
            });
        });
    }
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let state = SharedState::new(Node::new(chain(64)));
    c.bench_function("shared_state_snapshot", |b| {
        b.iter(|| state.snapshot());
    });
}

criterion_group!(benches, bench_commit_by_depth, bench_snapshot);
criterion_main!(benches);
