//! Integration tests for condition trees

use ripple_foundation::Fact;
use ripple_network::{ConditionsTree, Network, NodeKind, NodeState};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn rendering_follows_construction_order() {
    let cases = [
        (ConditionsTree::when("a"), "a"),
        (ConditionsTree::when("a").and("b"), "and(a, b)"),
        (ConditionsTree::when("a").and("b").or("c"), "and(a, or(b, c))"),
        (ConditionsTree::when("a").or("b").and("c"), "or(a, and(b, c))"),
        (
            ConditionsTree::when("in_doors").and("wet").and("out_of_beer").or("company"),
            "and(in_doors, and(wet, or(out_of_beer, company)))",
        ),
        (ConditionsTree::new(), "_"),
    ];
    for (tree, expected) in cases {
        assert_eq!(tree.to_string(), expected);
    }
}

#[test]
fn trees_copy_between_networks() {
    let tree = ConditionsTree::when("july").or("wet").and("windy");

    let mut target = Network::new();
    let root = tree.root().unwrap();
    let copy = tree.network().duplicate_into(root, &mut target).unwrap();

    // A duplicated join is empty; a duplicated leaf keeps its fact
    assert_eq!(target.get(copy).unwrap().kind(), &NodeKind::Or);
    assert_eq!(target.get(copy).unwrap().left(), None);
    let other = ConditionsTree::when("x").or("y");
    assert!(tree.same_kind(root, &other, other.root().unwrap()));

    let leaf = tree.node(root).unwrap().left().unwrap();
    let leaf_copy = tree.network().duplicate_into(leaf, &mut target).unwrap();
    assert_eq!(target.get(leaf_copy).unwrap().fact(), Some(&Fact::from("july")));
}

#[test]
fn rebuilt_tree_is_independent() {
    let tree = ConditionsTree::when("a").and("b").or("c");
    let mut rebuilt = ConditionsTree::new();
    for id in tree.iter() {
        rebuilt.push_duplicate(tree.network(), id).unwrap();
    }
    assert_eq!(rebuilt, tree);

    let leaf = rebuilt.node(rebuilt.root().unwrap()).unwrap().left().unwrap();
    rebuilt.set_leaf_state(leaf, true).unwrap();
    assert_eq!(tree.node(tree.root().unwrap()).unwrap().state(), NodeState::Unknown);
}

#[test]
fn tree_started_with_a_join_replays_losslessly() {
    let tree = ConditionsTree::new().and("x").or("y");
    assert_eq!(tree.to_string(), "or(x, y)");

    let mut rebuilt = ConditionsTree::new();
    for id in tree.iter() {
        rebuilt.push_duplicate(tree.network(), id).unwrap();
    }
    assert_eq!(rebuilt, tree);
    assert_eq!(rebuilt.to_string(), tree.to_string());
}

#[test]
fn callback_sees_every_observable_change() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);

    let mut tree = ConditionsTree::when("wet").and("cold");
    tree.on_state_change(move |_| seen.set(seen.get() + 1));
    let root = tree.root().unwrap();
    let wet = tree.node(root).unwrap().left().unwrap();
    let cold = tree.node(root).unwrap().right().unwrap();

    // Unknown -> False stays silent
    tree.set_leaf_state(wet, false).unwrap();
    tree.set_leaf_state(cold, false).unwrap();
    assert_eq!(tree.state(), NodeState::False);
    assert_eq!(calls.get(), 0);

    tree.set_leaf_state(wet, true).unwrap();
    tree.set_leaf_state(cold, true).unwrap();
    tree.set_leaf_state(cold, false).unwrap();
    assert_eq!(calls.get(), 2);
}
