//! Integration tests for rule registration

use ripple_engine::Inferer;
use ripple_foundation::{ErrorKind, Fact, RuleId};
use ripple_network::{ConditionsTree, NodeKind, NodeState};

#[test]
fn rules_are_counted_in_order() {
    let mut engine = Inferer::new();
    let a = engine.when("wet").implies(["raining"]).id();
    let b = engine.when("raining").and("cold").implies(["winter"]).id();

    assert_eq!(engine.rule_count(), 2);
    assert_eq!((a, b), (RuleId::new(0), RuleId::new(1)));
    let ids: Vec<RuleId> = engine.rules().map(|rule| rule.id()).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn condition_follows_construction_order() {
    let mut engine = Inferer::new();
    let id = engine.when("july").or("wet").and("windy").implies(["winter"]).id();

    let expected = ConditionsTree::when("july").or("wet").and("windy");
    assert_eq!(
        engine.display_rule(id).unwrap().to_string(),
        format!("rule#0: {expected} => winter")
    );
    assert_eq!(engine.rule(id).unwrap().actions(), &[Fact::from("winter")]);
}

#[test]
fn rules_reuse_cached_leaves() {
    let mut engine = Inferer::new();
    engine.when("july").or("wet").and("windy");
    assert_eq!(engine.symbols().len(), 3);

    engine.when("wet").and("july");
    assert_eq!(engine.symbols().len(), 3);
}

#[test]
fn rule_from_tree_shares_leaves_and_copies_joins() {
    let tree = ConditionsTree::when("raining").and("cold");

    let mut engine = Inferer::new();
    let a = engine.when_conditions(&tree).unwrap().id();
    let b = engine.when("cold").id();

    let root_a = engine.condition_root(a).unwrap().unwrap();
    let root_b = engine.condition_root(b).unwrap().unwrap();
    let network = engine.network();

    // The cold leaf is shared
    assert_eq!(network.get(root_a).unwrap().right(), Some(root_b));
    // The AND join is a copy; the tree's own network is untouched
    assert_eq!(network.get(root_a).unwrap().kind(), &NodeKind::And);
    assert_eq!(network.len(), 5);
    assert_eq!(tree.network().len(), 4);
    assert_eq!(engine.rule_state(a).unwrap(), NodeState::Unknown);
}

#[test]
fn tree_rule_infers() {
    let tree = ConditionsTree::when("raining").and("cold");
    let mut engine = Inferer::new();
    engine.when_conditions(&tree).unwrap().implies(["winter"]);

    engine.assert(["raining", "cold"]);
    let facts = engine.infer().unwrap();
    assert_eq!(facts.len(), 3);
    assert!(facts.contains("winter"));
}

#[test]
fn empty_tree_never_fires() {
    let mut engine = Inferer::new();
    let id = engine.when_conditions(&ConditionsTree::new()).unwrap().implies(["x"]).id();
    engine.assert(["anything"]);
    engine.infer().unwrap();
    assert!(!engine.fired(id).unwrap());
    assert!(!engine.facts().contains("x"));
}

#[test]
fn tree_started_with_a_join_attaches_as_built() {
    let mut engine = Inferer::new();
    let tree = ConditionsTree::new().and("wet");
    let id = engine.when_conditions(&tree).unwrap().implies(["raining"]).id();
    assert_eq!(engine.display_rule(id).unwrap().to_string(), "rule#0: wet => raining");

    engine.assert(["wet"]);
    assert!(engine.infer().unwrap().contains("raining"));
    assert!(engine.fired(id).unwrap());
}

#[test]
fn pattern_node_is_created_once() {
    let mut engine = Inferer::new();
    let a = engine.pattern_node("wet");
    let b = engine.pattern_node(":wet");
    assert_eq!(a, b);
    assert_eq!(engine.network().get(a).unwrap().fact(), Some(&Fact::from("wet")));
}

#[test]
fn pattern_node_mirrors_memory() {
    let mut engine = Inferer::new();
    engine.assert(["wet"]);
    let wet = engine.pattern_node("wet");
    let cold = engine.pattern_node("cold");
    assert_eq!(engine.network().state(wet).unwrap(), NodeState::True);
    assert_eq!(engine.network().state(cold).unwrap(), NodeState::False);
}

#[test]
fn unknown_rule_ids_are_errors() {
    let engine = Inferer::new();
    for result in [
        engine.fired(RuleId::new(0)).map(|_| ()),
        engine.condition_root(RuleId::new(0)).map(|_| ()),
        engine.rule(RuleId::new(0)).map(|_| ()),
    ] {
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownRule(_)));
    }
}
