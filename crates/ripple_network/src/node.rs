//! Node kinds and arena slots.

use std::fmt;

use ripple_foundation::{Fact, NodeId};

use crate::state::NodeState;

/// The concrete kind of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A fact leaf. Its state mirrors the fact's presence.
    Leaf(Fact),
    /// Conjunction of the left and right inputs.
    And,
    /// Disjunction of the left and right inputs.
    Or,
    /// Virtual tree root. Its left input is a permanently-true placeholder,
    /// so its state is simply its right input's state.
    Root,
}

impl NodeKind {
    /// Returns true for fact leaves.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns true for every kind with inputs (including the virtual root).
    #[must_use]
    pub fn is_join(&self) -> bool {
        !self.is_leaf()
    }

    /// Returns the fact of a leaf.
    #[must_use]
    pub fn fact(&self) -> Option<&Fact> {
        match self {
            Self::Leaf(fact) => Some(fact),
            _ => None,
        }
    }

    /// Short lowercase name of the kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "leaf",
            Self::And => "and",
            Self::Or => "or",
            Self::Root => "root",
        }
    }

    /// Returns true if both kinds are the same variant, ignoring leaf symbols.
    #[must_use]
    pub fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(fact) => write!(f, "{fact}"),
            other => f.write_str(other.name()),
        }
    }
}

/// A node slot in a [`Network`](crate::Network) arena.
///
/// Input and output links are kept in both directions: a join lists its
/// inputs, and every input lists the joins listening to it.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) state: NodeState,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    /// Listeners, one entry per link (a join that uses this node as both
    /// inputs appears twice).
    pub(crate) outputs: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, state: NodeState) -> Self {
        Self {
            kind,
            state,
            left: None,
            right: None,
            outputs: Vec::new(),
        }
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node's current state.
    #[must_use]
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Left input, if wired. Always `None` for leaves and virtual roots.
    #[must_use]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Right input, if wired. Always `None` for leaves.
    #[must_use]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Nodes listening to this node's state.
    #[must_use]
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Returns true if `node` listens to this node.
    #[must_use]
    pub fn has_output(&self, node: NodeId) -> bool {
        self.outputs.contains(&node)
    }

    /// The fact of a leaf node.
    #[must_use]
    pub fn fact(&self) -> Option<&Fact> {
        self.kind.fact()
    }

    /// Returns true for fact leaves.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    /// Computes this node's state from its input states.
    ///
    /// Leaves keep their own state; missing inputs count as unknown.
    pub(crate) fn derive(&self, left: NodeState, right: NodeState) -> NodeState {
        match self.kind {
            NodeKind::Leaf(_) => self.state,
            NodeKind::And => left.and(right),
            NodeKind::Or => left.or(right),
            NodeKind::Root => NodeState::True.and(right),
        }
    }
}
