//! Property tests for rule evaluation

use proptest::prelude::*;
use ripple_engine::Inferer;

fn formula(ops: &[bool], values: &[bool]) -> bool {
    // op1(x0, op2(x1, ... opn(x(n-1), xn)))
    let mut acc = values[ops.len()];
    for i in (0..ops.len()).rev() {
        acc = if ops[i] {
            values[i] && acc
        } else {
            values[i] || acc
        };
    }
    acc
}

proptest! {
    #[test]
    fn rule_fires_exactly_when_its_formula_holds(
        ops in prop::collection::vec(any::<bool>(), 0..8),
        values in prop::collection::vec(any::<bool>(), 9),
        registered_late in any::<bool>(),
    ) {
        let present: Vec<String> = (0..=ops.len())
            .filter(|&i| values[i])
            .map(|i| format!("x{i}"))
            .collect();

        let mut engine = Inferer::new();
        if registered_late {
            engine.assert(present.iter());
            engine.infer().unwrap();
        }

        let mut rule = engine.when("x0");
        for (i, &and) in ops.iter().enumerate() {
            let fact = format!("x{}", i + 1);
            rule = if and { rule.and(fact) } else { rule.or(fact) };
        }
        let id = rule.implies(["out"]).id();

        if !registered_late {
            engine.assert(present.iter());
        }
        let facts = engine.infer().unwrap();

        let expected = formula(&ops, &values);
        prop_assert_eq!(engine.fired(id).unwrap(), expected);
        prop_assert_eq!(facts.contains("out"), expected);
    }

    #[test]
    fn toggling_facts_tracks_the_formula(
        ops in prop::collection::vec(any::<bool>(), 1..6),
        steps in prop::collection::vec((0usize..6, any::<bool>()), 1..20),
    ) {
        let mut engine = Inferer::new();
        let mut rule = engine.when("x0");
        for (i, &and) in ops.iter().enumerate() {
            let fact = format!("x{}", i + 1);
            rule = if and { rule.and(fact) } else { rule.or(fact) };
        }
        let id = rule.implies(["out"]).id();

        let mut values = vec![false; ops.len() + 1];
        for (index, present) in steps {
            let index = index % values.len();
            values[index] = present;
            let fact = format!("x{index}");
            if present {
                engine.assert([fact]);
            } else {
                engine.unassert([fact]);
            }
            let facts = engine.infer().unwrap();
            let expected = formula(&ops, &values);
            prop_assert_eq!(engine.fired(id).unwrap(), expected);
            prop_assert_eq!(facts.contains("out"), expected);
        }
    }
}
