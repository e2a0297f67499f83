//! Scenario 4 (spec.md §8): vector copy-on-write.

use treecow::{Node, NodeVector, Vector};

#[derive(Clone, Debug, PartialEq)]
struct Employee {
    name: String,
}

fn employees(names: &[&str]) -> NodeVector<Employee> {
    NodeVector::from_nodes(
        names.iter().map(|n| Node::new(Employee { name: (*n).into() })).collect(),
    )
}

#[test]
fn cloning_a_node_vector_is_shallow_until_a_mutation_happens() {
    let src = employees(&["Ada", "Grace", "Hedy"]);
    let clone = src.clone();

    assert_eq!(src.len(), 3);
    assert_eq!(clone.len(), 3);
    // Shared storage: the same child payload is observed through both
    // handles right after a shallow clone.
    assert!(src[0].fingerprint().is_same_as_node(&clone[0]));
}

#[test]
fn modifying_a_clone_does_not_affect_the_source() {
    let src = employees(&["Ada", "Grace", "Hedy"]);
    let mut clone = src.clone();

    clone.modify(1).write().name = "Grace Hopper".into();

    assert_eq!(clone[1].read().name, "Grace Hopper");
    assert_eq!(src[1].read().name, "Grace");
    // Untouched children still share their payload with the source.
    assert!(src[0].fingerprint().is_same_as_node(&clone[0]));
    assert!(src[2].fingerprint().is_same_as_node(&clone[2]));
}

#[test]
fn push_pop_insert_erase_on_a_shared_vector_clone_the_storage() {
    let mut v = employees(&["Ada", "Grace"]);
    let shared = v.clone();

    v.push_back(Node::new(Employee { name: "Hedy".into() }));
    assert_eq!(v.len(), 3);
    assert_eq!(shared.len(), 2);

    v.insert(0, Node::new(Employee { name: "Margaret".into() }));
    assert_eq!(v.len(), 4);
    assert_eq!(v[0].read().name, "Margaret");

    v.erase(1);
    assert_eq!(v.len(), 3);
    assert_eq!(v[1].read().name, "Grace");

    v.pop_back();
    assert_eq!(v.len(), 2);
}

#[test]
fn find_if_returns_a_scoped_ref_ready_for_write() {
    let mut v = employees(&["Ada", "Grace", "Hedy"]);
    {
        let mut found = v.find_if(|e| e.name == "Grace");
        assert!(found.is_some());
        found.write().name = "Grace Hopper".into();
    }
    assert_eq!(v.get(1).unwrap().read().name, "Grace Hopper");

    let mut missing = v.find_if(|e| e.name == "Nobody");
    assert!(!missing.is_some());
}

#[test]
fn plain_vector_clears_and_resizes() {
    let mut v = Vector::from_values(vec![1, 2, 3]);
    let shared = v.clone();

    v.resize(5, 0);
    assert_eq!(v.len(), 5);
    assert_eq!(v.get(4), Some(&0));
    assert_eq!(shared.len(), 3);

    v.clear();
    assert!(v.is_empty());
    assert_eq!(shared.len(), 3);
}

#[test]
fn reserve_on_a_shared_vector_with_enough_capacity_is_a_no_op() {
    let mut v = Vector::from_values(Vec::with_capacity(16));
    v.push_back(1);
    let shared = v.clone();
    let cap_before = v.capacity();

    v.reserve(4); // well under the existing capacity
    assert_eq!(v.capacity(), cap_before);
    assert_eq!(shared.len(), 1);
}
