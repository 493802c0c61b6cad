//! Integration tests for propagation through a shared network

use ripple_foundation::{ErrorKind, Fact, NodeId};
use ripple_network::{Network, NodeKind, NodeState, Side, TreeCursor};

fn leaf(net: &mut Network, fact: &str) -> NodeId {
    net.add_leaf(Fact::from(fact), NodeState::False)
}

// =============================================================================
// Joins
// =============================================================================

#[test]
fn and_or_truth_tables() {
    for (kind, table) in [
        (NodeKind::And, [false, false, false, true]),
        (NodeKind::Or, [false, true, true, true]),
    ] {
        for (i, expected) in table.into_iter().enumerate() {
            let mut net = Network::new();
            let l = leaf(&mut net, "l");
            let r = leaf(&mut net, "r");
            let join = net.add(kind.clone());
            net.set_input(join, Side::Left, Some(l)).unwrap();
            net.set_input(join, Side::Right, Some(r)).unwrap();
            net.evaluate(join).unwrap();

            net.set_state(l, i & 2 != 0).unwrap();
            net.set_state(r, i & 1 != 0).unwrap();
            assert_eq!(net.state(join).unwrap(), NodeState::from(expected), "{kind} {i:02b}");
        }
    }
}

#[test]
fn only_root_transitions_are_reported() {
    let mut net = Network::new();
    let wet = leaf(&mut net, "wet");
    let cold = leaf(&mut net, "cold");
    let mut cursor = TreeCursor::when(&mut net, wet).unwrap();
    cursor.and_node(&mut net, cold).unwrap();
    net.evaluate(cursor.sub_root()).unwrap();

    assert!(net.set_state(wet, true).unwrap().is_empty());
    let changes = net.set_state(cold, true).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].node, cursor.sub_root());
    assert!(changes[0].fired());
    assert!(changes[0].is_observable());
}

#[test]
fn one_leaf_feeds_many_trees() {
    let mut net = Network::new();
    let wet = leaf(&mut net, "wet");
    let cold = leaf(&mut net, "cold");

    let a = TreeCursor::when(&mut net, wet).unwrap();
    let mut b = TreeCursor::when(&mut net, cold).unwrap();
    b.or_node(&mut net, wet).unwrap();
    net.evaluate(a.sub_root()).unwrap();
    net.evaluate(b.sub_root()).unwrap();

    let changes = net.set_state(wet, true).unwrap();
    let mut roots: Vec<NodeId> = changes.iter().map(|c| c.node).collect();
    roots.sort();
    let mut expected = vec![a.sub_root(), b.sub_root()];
    expected.sort();
    assert_eq!(roots, expected);
}

#[test]
fn same_leaf_on_both_sides() {
    let mut net = Network::new();
    let wet = leaf(&mut net, "wet");
    let and = net.add(NodeKind::And);
    net.set_input(and, Side::Left, Some(wet)).unwrap();
    net.set_input(and, Side::Right, Some(wet)).unwrap();
    assert_eq!(net.get(wet).unwrap().outputs(), &[and, and]);

    net.set_state(wet, true).unwrap();
    assert_eq!(net.state(and).unwrap(), NodeState::True);

    // Rewiring one side leaves the other registration in place
    net.set_input(and, Side::Right, None).unwrap();
    assert_eq!(net.get(wet).unwrap().outputs(), &[and]);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn joins_are_not_settable() {
    let mut net = Network::new();
    let or = net.add(NodeKind::Or);
    let err = net.set_state(or, true).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalDirectMutation(id) if id == or));
}

#[test]
fn leaves_take_no_inputs() {
    let mut net = Network::new();
    let wet = leaf(&mut net, "wet");
    let cold = leaf(&mut net, "cold");
    let err = net.set_input(wet, Side::Left, Some(cold)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidJoinTarget(_)));

    let and = net.add(NodeKind::And);
    let err = net.graft(and, wet).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidJoinTarget(_)));
}

#[test]
fn cycles_are_rejected() {
    let mut net = Network::new();
    let a = net.add(NodeKind::And);
    let b = net.add(NodeKind::Or);
    net.set_input(a, Side::Right, Some(b)).unwrap();
    let err = net.set_input(b, Side::Left, Some(a)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidNodeConstruction { .. }));
}

#[test]
fn foreign_ids_are_rejected() {
    let mut net = Network::new();
    let err = net.set_state(NodeId::new(99), true).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownNode(_)));
}

// =============================================================================
// Depth
// =============================================================================

#[test]
fn deep_chain_in_shared_network() {
    let mut net = Network::new();
    let first = leaf(&mut net, "0");
    let mut cursor = TreeCursor::when(&mut net, first).unwrap();
    let mut leaves = vec![first];
    for i in 1..100_000_usize {
        let next = net.add_leaf(Fact::from(i), NodeState::True);
        cursor.or_node(&mut net, next).unwrap();
        leaves.push(next);
    }
    net.evaluate(cursor.sub_root()).unwrap();
    assert_eq!(cursor.state(&net), NodeState::True);

    for &id in &leaves[1..] {
        net.set_state(id, false).unwrap();
    }
    assert_eq!(cursor.state(&net), NodeState::False);

    let changes = net.set_state(leaves[99_999], true).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(cursor.iter(&net).count(), 2 * 100_000 - 1);
}
