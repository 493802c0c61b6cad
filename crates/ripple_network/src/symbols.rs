//! Leaf cache.
//!
//! Each engine keeps exactly one leaf per fact symbol. Every rule that
//! mentions a fact listens to the same leaf, so changing that fact touches
//! the network once regardless of how many rules depend on it.

use std::collections::HashMap;

use ripple_foundation::{Fact, NodeId};

use crate::network::Network;
use crate::node::NodeKind;
use crate::state::NodeState;

/// Map from fact symbol to its shared leaf node.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    leaves: HashMap<Fact, NodeId>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the leaf for `fact`, allocating it in `network` on first use.
    ///
    /// `initial` is only used when a new leaf is created. An existing leaf
    /// keeps whatever state it already has.
    pub fn resolve(&mut self, network: &mut Network, fact: &Fact, initial: NodeState) -> NodeId {
        if let Some(&id) = self.leaves.get(fact) {
            debug_assert!(leaf_matches(network, id, fact));
            return id;
        }

        let id = network.add_leaf(fact.clone(), initial);
        self.leaves.insert(fact.clone(), id);
        id
    }

    /// Looks up the leaf for `fact` without allocating.
    #[must_use]
    pub fn get(&self, fact: &Fact) -> Option<NodeId> {
        self.leaves.get(fact).copied()
    }

    /// Whether a leaf exists for `fact`.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool {
        self.leaves.contains_key(fact)
    }

    /// Number of cached leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns true if no leaves are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Iterates cached `(fact, leaf)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fact, NodeId)> {
        self.leaves.iter().map(|(fact, &id)| (fact, id))
    }
}

/// Whether `network` holds a leaf at `id` for `fact`.
pub(crate) fn leaf_matches(network: &Network, id: NodeId, fact: &Fact) -> bool {
    network
        .get(id)
        .is_some_and(|node| matches!(node.kind(), NodeKind::Leaf(f) if f == fact))
}
