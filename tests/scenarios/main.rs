//! End-to-end inference scenarios
//!
//! Small rule bases run from assertion to fixpoint, checking the final fact
//! set and, where it matters, how often callbacks ran.

use ripple_engine::{Inferer, InfererConfig};
use ripple_foundation::{ErrorKind, FactSet};
use ripple_network::ConditionsTree;
use std::cell::Cell;
use std::rc::Rc;

fn weather() -> Inferer {
    let mut engine = Inferer::new();
    engine.when("wet").implies(["raining"]);
    engine.when("raining").and("cold").implies(["winter"]);
    engine.when("winter").and("no_money").implies(["in_doors"]);
    engine
        .when("in_doors")
        .and("wet")
        .and("out_of_beer")
        .or("mother_in_law_over")
        .implies(["bad_times"]);
    engine
        .when("in_doors")
        .and("have_beer")
        .or("good_tv")
        .implies(["good_times"]);
    engine
}

#[test]
fn weather_reaches_good_times() {
    let mut engine = weather();
    engine.assert(["wet", "cold", "no_money", "have_beer"]);

    let facts = engine.infer().unwrap();
    assert_eq!(
        facts,
        FactSet::from([
            "wet",
            "raining",
            "cold",
            "winter",
            "no_money",
            "have_beer",
            "in_doors",
            "good_times",
        ])
    );
}

#[test]
fn weather_with_duplicate_rule() {
    let mut engine = weather();
    engine
        .when("in_doors")
        .and("have_beer")
        .or("good_tv")
        .implies(["good_times"]);
    engine.assert(["wet", "cold", "no_money", "have_beer"]);

    let facts = engine.infer().unwrap();
    assert_eq!(facts.len(), 8);
    assert!(facts.contains("good_times"));
}

#[test]
fn construction_order_not_precedence() {
    // in_doors AND (have_beer OR good_tv): good_tv alone is not enough
    let mut engine = weather();
    engine.assert(["good_tv"]);
    assert!(!engine.infer().unwrap().contains("good_times"));

    engine.assert(["wet", "cold", "no_money"]);
    assert!(engine.infer().unwrap().contains("good_times"));
}

#[test]
fn weather_winds_down() {
    let mut engine = weather();
    engine.assert(["wet", "cold", "no_money", "have_beer"]);
    engine.infer().unwrap();

    engine.unassert(["wet"]);
    let facts = engine.infer().unwrap();
    assert_eq!(facts, FactSet::from(["cold", "no_money", "have_beer"]));
}

#[test]
fn mutual_implication_terminates() {
    let mut engine = Inferer::new();
    engine.when("a").implies(["b"]);
    engine.when("b").implies(["a"]);
    engine.assert(["a"]);

    engine.infer().unwrap();
    assert_eq!(engine.facts(), &FactSet::from(["a", "b"]));
}

#[test]
fn long_chain_exceeds_cap() {
    let mut engine = Inferer::with_config(InfererConfig::new().with_max_iterations(5));
    for (from, to) in [("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "f"), ("f", "g")] {
        engine.when(from).implies([to]);
    }
    engine.assert(["a"]);

    let err = engine.infer().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::NonTerminatingInference {
            max_iterations: 5,
            passes: 7
        }
    ));
    let message = err.to_string();
    assert!(message.contains("after 5 iterations"), "{message}");
}

#[test]
fn shared_leaf_updates_every_rule_in_one_inference() {
    let mut engine = Inferer::new();
    let a = engine.when("wet").and("cold").implies(["sleet"]).id();
    let b = engine.when("wet").or("foggy").implies(["grey"]).id();
    engine.assert(["cold"]);
    engine.infer().unwrap();

    engine.assert(["wet"]);
    let facts = engine.infer().unwrap();
    assert!(engine.fired(a).unwrap() && engine.fired(b).unwrap());
    assert!(facts.contains("sleet") && facts.contains("grey"));

    engine.unassert(["wet"]);
    let facts = engine.infer().unwrap();
    assert_eq!(facts, FactSet::from(["cold"]));
}

#[test]
fn callback_counts_across_a_session() {
    let fired = Rc::new(Cell::new(0));
    let unfired = Rc::new(Cell::new(0));
    let (f, u) = (Rc::clone(&fired), Rc::clone(&unfired));

    let mut engine = weather();
    engine.when("good_times").on_change(move |state| {
        if state {
            f.set(f.get() + 1);
        } else {
            u.set(u.get() + 1);
        }
    });

    engine.assert(["wet", "cold", "no_money", "have_beer"]);
    engine.infer().unwrap();
    engine.reassert(["good_times"]);
    engine.infer().unwrap();
    engine.suspend_callbacks(|engine| {
        engine.unassert(["have_beer"]);
        engine.infer()
    })
    .unwrap();
    engine.assert(["good_tv"]);
    engine.infer().unwrap();

    assert_eq!((fired.get(), unfired.get()), (3, 0));
}

#[test]
fn prebuilt_tree_joins_the_rule_base() {
    let mut engine = weather();
    let tree = ConditionsTree::when("winter").and("in_doors").or("snowing");
    engine.when_conditions(&tree).unwrap().implies(["fire_lit"]).named("fireplace");

    engine.assert(["wet", "cold", "no_money"]);
    assert!(engine.infer().unwrap().contains("fire_lit"));
    assert_eq!(engine.symbols().len(), 11);
}
