//! Error types for the Ripple system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! error is fatal to the operation that raised it; nothing is retried.

use std::fmt;

use thiserror::Error;

use crate::fact::Fact;
use crate::ids::{NodeId, RuleId};

/// The main error type for Ripple operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an iteration-cap exceeded error.
    #[must_use]
    pub fn non_terminating(max_iterations: usize, passes: usize) -> Self {
        Self::new(ErrorKind::NonTerminatingInference {
            max_iterations,
            passes,
        })
    }

    /// Creates an invalid tree construction error.
    #[must_use]
    pub fn invalid_construction(node: NodeId, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidNodeConstruction {
            node,
            reason: reason.into(),
        })
    }

    /// Creates an illegal direct mutation error.
    #[must_use]
    pub fn illegal_mutation(node: NodeId) -> Self {
        Self::new(ErrorKind::IllegalDirectMutation(node))
    }

    /// Creates an invalid join target error.
    #[must_use]
    pub fn invalid_join_target(node: NodeId) -> Self {
        Self::new(ErrorKind::InvalidJoinTarget(node))
    }

    /// Creates an unknown node error.
    #[must_use]
    pub fn unknown_node(node: NodeId) -> Self {
        Self::new(ErrorKind::UnknownNode(node))
    }

    /// Creates an unknown rule error.
    #[must_use]
    pub fn unknown_rule(rule: RuleId) -> Self {
        Self::new(ErrorKind::UnknownRule(rule))
    }

    /// Returns true if this is an iteration-cap error.
    #[must_use]
    pub fn is_non_terminating(&self) -> bool {
        matches!(self.kind, ErrorKind::NonTerminatingInference { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The fixpoint loop was still learning facts after its iteration cap.
    #[error("still learning new facts after {max_iterations} iterations ({passes} passes)")]
    NonTerminatingInference {
        /// The configured iteration cap.
        max_iterations: usize,
        /// Number of passes completed when the cap tripped.
        passes: usize,
    },

    /// A node could not be appended while building a tree by hand.
    #[error("invalid node construction at {node}: {reason}")]
    InvalidNodeConstruction {
        /// The node that was being appended.
        node: NodeId,
        /// Why it was rejected.
        reason: String,
    },

    /// Attempted to set the state of a join node directly.
    #[error("join node {0} has derived state and cannot be set directly")]
    IllegalDirectMutation(NodeId),

    /// Attempted to graft onto or with a node that is not a join.
    #[error("node {0} is not a join and cannot take part in a graft")]
    InvalidJoinTarget(NodeId),

    /// A node id that does not belong to this network.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// A rule id that was never registered with this engine.
    #[error("unknown rule: {0}")]
    UnknownRule(RuleId),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the rule involved, if any.
    pub rule: Option<String>,
    /// Facts still pending when the operation aborted.
    pub pending: Vec<Fact>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule name.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Records facts that were still pending.
    #[must_use]
    pub fn with_pending(mut self, pending: impl IntoIterator<Item = Fact>) -> Self {
        self.pending.extend(pending);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "in rule {rule}")?;
        }
        if !self.pending.is_empty() {
            if self.rule.is_some() {
                write!(f, "; ")?;
            }
            write!(f, "pending:")?;
            for fact in &self.pending {
                write!(f, " {fact}")?;
            }
        }
        Ok(())
    }
}
