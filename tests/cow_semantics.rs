//! Scenario 1 (spec.md §8): plain leaf edit and nested copy-on-write.

use treecow::{Node, NodeTransaction};

#[derive(Clone, Debug, PartialEq)]
struct Address {
    city: String,
}

#[derive(Clone, Debug, PartialEq)]
struct Employee {
    name: String,
    address: Node<Address>,
}

#[test]
fn write_on_a_unique_node_mutates_in_place() {
    let mut node = Node::new(42i32);
    assert!(node.unique());
    let before = node.detach();
    *node.write() += 1;
    assert_eq!(*node.read(), 43);
    // still unique: no sharing was ever introduced.
    assert!(node.unique());
    drop(before);
}

#[test]
fn write_on_a_shared_node_clones_and_diverges() {
    let mut a = Node::new(String::from("alpha"));
    let b = a.share();
    assert!(!a.unique());
    assert!(!b.unique());

    a.write().push_str("-edited");

    assert_eq!(a.read(), "alpha-edited");
    assert_eq!(b.read(), "alpha");
    assert!(a.unique());
    assert!(b.unique());
}

#[test]
fn nested_write_cows_only_the_edited_child() {
    let employee = Employee {
        name: "Ada".into(),
        address: Node::new(Address { city: "London".into() }),
    };
    let mut root = Node::new(employee);
    let sibling = root.share();

    let sibling_address_detached = sibling.read().address.detach();

    root.write().address.write().city = "Paris".into();

    assert_eq!(root.read().name, "Ada");
    assert_eq!(root.read().address.read().city, "Paris");
    assert_eq!(sibling.read().address.read().city, "London");
    // The sibling's address child was never written, so it still shares the
    // exact payload a snapshot taken before the edit observed.
    assert!(sibling_address_detached.fingerprint().is_same_as_node(&sibling.read().address));
}

#[test]
fn replace_assigns_without_requiring_clone_of_the_whole_tree() {
    let mut node = Node::new(vec![1, 2, 3]);
    node.replace(vec![4, 5]);
    assert_eq!(node.read(), &[4, 5]);
}

#[test]
fn transaction_commits_on_normal_drop() {
    let mut node = Node::new(10i32);
    {
        let mut tx = NodeTransaction::new(&mut node);
        *tx += 5;
    }
    assert_eq!(*node.read(), 15);
}

#[test]
fn transaction_aborts_on_panic_unwind() {
    let mut node = Node::new(10i32);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut tx = NodeTransaction::new(&mut node);
        *tx += 5;
        panic!("simulated failure mid-transaction");
    }));
    assert!(result.is_err());
    assert_eq!(*node.read(), 10, "edits made before the panic must be rolled back");
}

#[test]
fn explicit_abort_discards_edits_without_a_panic() {
    let mut node = Node::new(String::from("base"));
    let mut tx = NodeTransaction::new(&mut node);
    tx.push_str("-scratch");
    tx.abort();
    drop(tx);
    assert_eq!(node.read(), "base");
}
