//! Condition trees.
//!
//! A condition is built as a right-nested chain of joins hanging off a
//! virtual root:
//!
//! ```text
//! when(wet).and(june).or(july)
//!
//!   root ── and ──┬── wet
//!                 └── or ──┬── june
//!                          └── july
//! ```
//!
//! Each appended operator grafts onto the current rightmost join (the active
//! branch), taking over its right operand as its own left operand. Nesting
//! follows construction order, not AND-over-OR precedence.

use std::fmt;

use ripple_foundation::{Error, Fact, NodeId, Result};

use crate::network::{DepthFirst, Network, Side};
use crate::node::{Node, NodeKind};
use crate::state::NodeState;

// =============================================================================
// Tree Cursor
// =============================================================================

/// The construction state of one tree inside a shared [`Network`].
///
/// The cursor holds the tree's virtual root and its active branch. It does
/// not own any nodes; the network does.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeCursor {
    sub_root: NodeId,
    active: NodeId,
}

impl TreeCursor {
    /// Allocates a virtual root in `network` and starts a tree there.
    pub fn new(network: &mut Network) -> Self {
        let sub_root = network.add(NodeKind::Root);
        Self {
            sub_root,
            active: sub_root,
        }
    }

    /// Starts a tree whose whole expression is the leaf `operand`.
    ///
    /// # Errors
    /// `UnknownNode` if `operand` is foreign, `InvalidNodeConstruction` if it
    /// is not a leaf.
    pub fn when(network: &mut Network, operand: NodeId) -> Result<Self> {
        expect_leaf(network, operand)?;
        let cursor = Self::new(network);
        network.link(cursor.sub_root, Side::Right, Some(operand));
        Ok(cursor)
    }

    /// The virtual root.
    #[must_use]
    pub fn sub_root(&self) -> NodeId {
        self.sub_root
    }

    /// The rightmost join, where the next operator is grafted.
    #[must_use]
    pub fn active_branch(&self) -> NodeId {
        self.active
    }

    /// The real expression root (the virtual root's right input).
    #[must_use]
    pub fn root(&self, network: &Network) -> Option<NodeId> {
        network.get(self.sub_root).and_then(Node::right)
    }

    /// The tree's state, which is the virtual root's state.
    #[must_use]
    pub fn state(&self, network: &Network) -> NodeState {
        network.get(self.sub_root).map_or(NodeState::Unknown, Node::state)
    }

    /// Makes `operand` the whole expression of a fresh tree.
    ///
    /// # Errors
    /// Returns an error if `operand` is foreign or would create a cycle.
    pub fn set_root(&mut self, network: &mut Network, operand: NodeId) -> Result<()> {
        network.set_input(self.sub_root, Side::Right, Some(operand))
    }

    /// Appends `AND operand` to the chain and returns the new join.
    ///
    /// On an empty tree `operand` becomes the whole expression and is
    /// returned instead.
    ///
    /// # Errors
    /// `UnknownNode` if `operand` or the cursor is foreign to `network`,
    /// `InvalidNodeConstruction` if `operand` is not a leaf.
    pub fn and_node(&mut self, network: &mut Network, operand: NodeId) -> Result<NodeId> {
        self.join_to_branch(network, NodeKind::And, operand)
    }

    /// Appends `OR operand` to the chain and returns the new join.
    ///
    /// Same rules as [`and_node`](Self::and_node).
    ///
    /// # Errors
    /// `UnknownNode` or `InvalidNodeConstruction`, as for `and_node`.
    pub fn or_node(&mut self, network: &mut Network, operand: NodeId) -> Result<NodeId> {
        self.join_to_branch(network, NodeKind::Or, operand)
    }

    fn join_to_branch(
        &mut self,
        network: &mut Network,
        kind: NodeKind,
        operand: NodeId,
    ) -> Result<NodeId> {
        expect_leaf(network, operand)?;
        let prior = network.node(self.active)?.right();

        // Nothing to join with yet
        if prior.is_none() && self.active == self.sub_root {
            network.link(self.sub_root, Side::Right, Some(operand));
            return Ok(operand);
        }

        let join = network.add(kind);
        network.link(join, Side::Right, Some(operand));

        // Graft: the new join takes the active branch's right operand
        network.link(join, Side::Left, prior);
        network.link(self.active, Side::Right, Some(join));

        // The rightmost join is always the active branch
        self.active = join;
        Ok(join)
    }

    /// Appends an already-allocated node in depth-first order.
    ///
    /// A leaf fills the active branch's empty left input, or else its right
    /// input. A join becomes the active branch's right input and the new
    /// active branch. Replaying [`iter`](Self::iter) through `append`
    /// rebuilds an equal tree.
    ///
    /// # Errors
    /// `InvalidNodeConstruction` if `node` is a virtual root, or the active
    /// branch has no free slot for it.
    pub fn append(&mut self, network: &mut Network, node: NodeId) -> Result<()> {
        let branch = network.node(self.active)?;
        let left_open = !matches!(branch.kind(), NodeKind::Root) && branch.left().is_none();
        let right_open = branch.right().is_none();

        let is_leaf = match network.node(node)?.kind() {
            NodeKind::Leaf(_) => true,
            NodeKind::And | NodeKind::Or => false,
            NodeKind::Root => {
                return Err(Error::invalid_construction(
                    node,
                    "a virtual root cannot be appended",
                ));
            }
        };

        if is_leaf {
            let side = if left_open {
                Side::Left
            } else if right_open {
                Side::Right
            } else {
                return Err(Error::invalid_construction(
                    node,
                    "the active branch has no free input",
                ));
            };
            return network.set_input(self.active, side, Some(node));
        }

        if !right_open {
            return Err(Error::invalid_construction(
                node,
                "the active branch already has a right input",
            ));
        }
        network.set_input(self.active, Side::Right, Some(node))?;
        self.active = node;
        Ok(())
    }

    /// Depth-first enumeration from the expression root.
    #[must_use]
    pub fn iter<'a>(&self, network: &'a Network) -> DepthFirst<'a> {
        network.depth_first(self.root(network))
    }
}

fn expect_leaf(network: &Network, operand: NodeId) -> Result<()> {
    if network.node(operand)?.is_leaf() {
        Ok(())
    } else {
        Err(Error::invalid_construction(
            operand,
            "chain operands must be fact leaves",
        ))
    }
}

// =============================================================================
// Conditions Tree
// =============================================================================

/// A standalone condition tree that owns its own small network.
///
/// Useful for building a condition ahead of time, inspecting or driving it
/// directly, and later attaching it to an engine (which copies it into the
/// engine's shared network).
///
/// # Example
///
/// ```
/// use ripple_network::{ConditionsTree, NodeKind};
///
/// let tree = ConditionsTree::when("wet").and("june").or("july");
/// assert_eq!(tree.to_string(), "and(wet, or(june, july))");
///
/// let root = tree.node(tree.root().unwrap()).unwrap();
/// assert_eq!(root.kind(), &NodeKind::And);
/// ```
pub struct ConditionsTree {
    network: Network,
    cursor: TreeCursor,
    on_change: Option<Box<dyn FnMut(bool)>>,
}

impl ConditionsTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        let mut network = Network::new();
        let cursor = TreeCursor::new(&mut network);
        Self {
            network,
            cursor,
            on_change: None,
        }
    }

    /// Creates a tree whose condition is a single fact.
    #[must_use]
    pub fn when(fact: impl Into<Fact>) -> Self {
        let mut network = Network::new();
        let leaf = network.add(NodeKind::Leaf(fact.into()));
        let cursor = TreeCursor::when(&mut network, leaf).expect("leaf exists");
        Self {
            network,
            cursor,
            on_change: None,
        }
    }

    /// Appends `AND fact`.
    #[must_use]
    pub fn and(mut self, fact: impl Into<Fact>) -> Self {
        let leaf = self.network.add(NodeKind::Leaf(fact.into()));
        self.cursor
            .and_node(&mut self.network, leaf)
            .expect("leaf exists");
        self
    }

    /// Appends `OR fact`.
    #[must_use]
    pub fn or(mut self, fact: impl Into<Fact>) -> Self {
        let leaf = self.network.add(NodeKind::Leaf(fact.into()));
        self.cursor
            .or_node(&mut self.network, leaf)
            .expect("leaf exists");
        self
    }

    /// Allocates a node of `kind` and appends it (see [`TreeCursor::append`]).
    ///
    /// # Errors
    /// Returns `InvalidNodeConstruction` for virtual roots or when the active
    /// branch has no room.
    pub fn push(&mut self, kind: NodeKind) -> Result<NodeId> {
        let id = self.network.add(kind);
        self.cursor.append(&mut self.network, id)?;
        Ok(id)
    }

    /// Duplicates a node of another network into this tree and appends it.
    ///
    /// # Errors
    /// Returns an error if `id` is not in `source` or cannot be appended.
    pub fn push_duplicate(&mut self, source: &Network, id: NodeId) -> Result<NodeId> {
        let copy = source.duplicate_into(id, &mut self.network)?;
        self.cursor.append(&mut self.network, copy)?;
        Ok(copy)
    }

    /// Appends a node already allocated in this tree's network.
    ///
    /// # Errors
    /// See [`TreeCursor::append`].
    pub fn append(&mut self, id: NodeId) -> Result<()> {
        self.cursor.append(&mut self.network, id)
    }

    /// Registers the callback invoked with the new state whenever the tree's
    /// state changes observably.
    pub fn on_state_change(&mut self, callback: impl FnMut(bool) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Sets a leaf's state, propagating and notifying the callback.
    ///
    /// # Errors
    /// `IllegalDirectMutation` for joins, `UnknownNode` for foreign ids.
    pub fn set_leaf_state(&mut self, leaf: NodeId, state: bool) -> Result<()> {
        let changes = self.network.set_state(leaf, state)?;
        for change in changes.into_iter().filter(|c| c.is_observable()) {
            if let Some(callback) = self.on_change.as_mut() {
                callback(change.fired());
            }
        }
        Ok(())
    }

    /// The virtual root.
    #[must_use]
    pub fn sub_root(&self) -> NodeId {
        self.cursor.sub_root()
    }

    /// The real expression root.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.cursor.root(&self.network)
    }

    /// The rightmost join.
    #[must_use]
    pub fn active_branch(&self) -> NodeId {
        self.cursor.active_branch()
    }

    /// The tree's state.
    #[must_use]
    pub fn state(&self) -> NodeState {
        self.cursor.state(&self.network)
    }

    /// Gets a node of this tree.
    ///
    /// # Errors
    /// Returns an error if the id is not part of this tree's network.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.network.node(id)
    }

    /// Depth-first enumeration from the expression root.
    #[must_use]
    pub fn iter(&self) -> DepthFirst<'_> {
        self.cursor.iter(&self.network)
    }

    /// The tree's own network.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Compares only the kinds of a node of this tree and a node of another.
    #[must_use]
    pub fn same_kind(&self, a: NodeId, other: &ConditionsTree, b: NodeId) -> bool {
        self.network.same_kind(a, &other.network, b)
    }
}

impl Default for ConditionsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ConditionsTree {
    fn eq(&self, other: &Self) -> bool {
        self.network
            .same_structure(self.root(), &other.network, other.root())
    }
}

impl fmt::Display for ConditionsTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.network.render(self.root()))
    }
}

impl fmt::Debug for ConditionsTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionsTree")
            .field("condition", &self.to_string())
            .field("state", &self.state())
            .field("nodes", &self.network.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
