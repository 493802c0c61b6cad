//! Integration tests for error types

use ripple_foundation::{Error, ErrorContext, ErrorKind, Fact, NodeId, RuleId};

#[test]
fn error_kinds_render() {
    let cases = [
        (Error::invalid_join_target(NodeId::new(1)), "node#1"),
        (Error::illegal_mutation(NodeId::new(2)), "node#2"),
        (Error::unknown_node(NodeId::new(3)), "node#3"),
        (Error::unknown_rule(RuleId::new(4)), "rule#4"),
        (Error::invalid_construction(NodeId::new(5), "no room"), "no room"),
    ];
    for (err, needle) in cases {
        let msg = err.to_string();
        assert!(msg.contains(needle), "{msg:?} should mention {needle:?}");
        assert!(!err.is_non_terminating());
    }
}

#[test]
fn non_terminating_carries_counts() {
    let err = Error::non_terminating(5, 7);
    assert!(err.is_non_terminating());
    match err.kind {
        ErrorKind::NonTerminatingInference {
            max_iterations,
            passes,
        } => assert_eq!((max_iterations, passes), (5, 7)),
        other => panic!("unexpected kind: {other}"),
    }
}

#[test]
fn context_is_optional() {
    let err = Error::unknown_rule(RuleId::new(0));
    assert!(err.context.is_none());

    let err = err.with_context(ErrorContext::new().with_pending([Fact::from("x")]));
    let context = err.context.unwrap();
    assert_eq!(context.rule, None);
    assert_eq!(context.to_string(), "pending: x");
}

#[test]
fn errors_are_std_errors() {
    fn takes(_: &dyn std::error::Error) {}
    takes(&Error::unknown_node(NodeId::new(0)));
}
