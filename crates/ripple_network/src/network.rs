//! Node arena and work-list propagation.
//!
//! A [`Network`] owns every node it allocates. Nodes reference each other by
//! [`NodeId`] only, so leaves can fan out to joins of many trees without any
//! shared ownership. Links are kept bidirectionally: rewiring an input
//! unregisters the join from the old input's outputs before registering it
//! on the new one.

use std::collections::VecDeque;

use ripple_foundation::{Error, Fact, NodeId, Result};

use crate::node::{Node, NodeKind};
use crate::state::NodeState;

/// Which input of a join.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// The left input.
    Left,
    /// The right input.
    Right,
}

/// A state transition of a virtual root, reported by propagation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StateChange {
    /// The root that changed.
    pub node: NodeId,
    /// State before the change.
    pub from: NodeState,
    /// State after the change.
    pub to: NodeState,
}

impl StateChange {
    /// Returns true if the transition should be delivered to observers.
    ///
    /// A condition that has never been satisfied resolving from unknown to
    /// false is not a change of its fired state, so it stays silent.
    #[must_use]
    pub fn is_observable(&self) -> bool {
        !matches!(
            (self.from, self.to),
            (_, NodeState::Unknown) | (NodeState::Unknown, NodeState::False)
        )
    }

    /// Returns true if the root became true.
    #[must_use]
    pub fn fired(&self) -> bool {
        self.to.is_true()
    }
}

/// Arena of propagation nodes.
#[derive(Clone, Debug, Default)]
pub struct Network {
    nodes: Vec<Node>,
}

impl Network {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of allocated nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes have been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates an unattached node of the given kind in the unknown state.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn add(&mut self, kind: NodeKind) -> NodeId {
        self.add_with_state(kind, NodeState::Unknown)
    }

    /// Allocates an unattached leaf with an initial state.
    pub fn add_leaf(&mut self, fact: Fact, state: NodeState) -> NodeId {
        self.add_with_state(NodeKind::Leaf(fact), state)
    }

    fn add_with_state(&mut self, kind: NodeKind, state: NodeState) -> NodeId {
        let index = u32::try_from(self.nodes.len()).expect("too many nodes");
        self.nodes.push(Node::new(kind, state));
        NodeId::new(index)
    }

    /// Gets a node if the id belongs to this network.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Gets a node.
    ///
    /// # Errors
    /// Returns an error if the id does not belong to this network.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or_else(|| Error::unknown_node(id))
    }

    /// Returns a node's current state.
    ///
    /// # Errors
    /// Returns an error if the id does not belong to this network.
    pub fn state(&self, id: NodeId) -> Result<NodeState> {
        self.node(id).map(Node::state)
    }

    /// Iterates all nodes in allocation order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        // Indices fit: `add` refuses to grow past u32::MAX
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u32), node))
    }

    // =========================================================================
    // Wiring
    // =========================================================================

    /// Rewires one input of a join, keeping output links in sync.
    ///
    /// # Errors
    /// - `InvalidJoinTarget` if `join` is a leaf
    /// - `InvalidNodeConstruction` for the fixed left input of a virtual root,
    ///   or if the new input would make the graph cyclic
    /// - `UnknownNode` for foreign ids
    pub fn set_input(&mut self, join: NodeId, side: Side, input: Option<NodeId>) -> Result<()> {
        let node = self.node(join)?;
        if node.is_leaf() {
            return Err(Error::invalid_join_target(join));
        }
        if side == Side::Left && matches!(node.kind, NodeKind::Root) {
            return Err(Error::invalid_construction(
                join,
                "the virtual root's left input is fixed",
            ));
        }
        if let Some(input) = input {
            self.node(input)?;
            if self.reaches(input, join) {
                return Err(Error::invalid_construction(
                    input,
                    "wiring would create a cycle",
                ));
            }
        }
        self.link(join, side, input);
        Ok(())
    }

    /// Unchecked rewiring for callers that already hold valid ids.
    pub(crate) fn link(&mut self, join: NodeId, side: Side, input: Option<NodeId>) {
        let slot = match side {
            Side::Left => &mut self.nodes[join.index()].left,
            Side::Right => &mut self.nodes[join.index()].right,
        };
        let old = std::mem::replace(slot, input);

        if let Some(old) = old {
            let outputs = &mut self.nodes[old.index()].outputs;
            if let Some(pos) = outputs.iter().position(|&o| o == join) {
                outputs.remove(pos);
            }
        }
        if let Some(new) = input {
            self.nodes[new.index()].outputs.push(join);
        }
    }

    /// Returns true if `target` is `from` or one of its transitive inputs.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            let node = &self.nodes[id.index()];
            stack.extend(node.left.into_iter().chain(node.right));
        }
        false
    }

    /// Extends a chain: `new_join` takes `join`'s prior right input as its
    /// left input, and becomes `join`'s right input.
    ///
    /// # Errors
    /// Returns `InvalidJoinTarget` if `join` is not a join or `new_join` is
    /// not an AND/OR join.
    pub fn graft(&mut self, join: NodeId, new_join: NodeId) -> Result<()> {
        if !self.node(join)?.kind.is_join() {
            return Err(Error::invalid_join_target(join));
        }
        if !matches!(self.node(new_join)?.kind, NodeKind::And | NodeKind::Or) {
            return Err(Error::invalid_join_target(new_join));
        }
        let prior = self.nodes[join.index()].right;
        self.set_input(new_join, Side::Left, prior)?;
        self.set_input(join, Side::Right, Some(new_join))
    }

    // =========================================================================
    // Propagation
    // =========================================================================

    /// Sets a leaf's state and propagates the change.
    ///
    /// Returns the virtual-root transitions caused by the change, in the
    /// order they happened. Setting a leaf to its current state does nothing.
    ///
    /// # Errors
    /// Returns `IllegalDirectMutation` if the node is a join.
    pub fn set_state(&mut self, id: NodeId, state: bool) -> Result<Vec<StateChange>> {
        let node = self.node(id)?;
        if !node.is_leaf() {
            return Err(Error::illegal_mutation(id));
        }
        let new = NodeState::from(state);
        if node.state == new {
            return Ok(Vec::new());
        }
        self.nodes[id.index()].state = new;
        Ok(self.propagate(id))
    }

    /// Notifies listeners of `from` breadth-first until states stop moving.
    fn propagate(&mut self, from: NodeId) -> Vec<StateChange> {
        let mut changes = Vec::new();
        let mut worklist: VecDeque<NodeId> =
            self.nodes[from.index()].outputs.iter().copied().collect();

        while let Some(id) = worklist.pop_front() {
            let Some(change) = self.refresh(id) else {
                continue;
            };
            let node = &self.nodes[id.index()];
            if matches!(node.kind, NodeKind::Root) {
                changes.push(change);
            }
            worklist.extend(node.outputs.iter().copied());
        }

        changes
    }

    /// Recomputes every join under `top` from its leaves upward.
    ///
    /// Used to settle a tree whose joins were wired after its leaves already
    /// held states. Returns the transition of `top` if it is a virtual root
    /// whose state moved.
    ///
    /// # Errors
    /// Returns an error if `top` does not belong to this network.
    pub fn evaluate(&mut self, top: NodeId) -> Result<Vec<StateChange>> {
        self.node(top)?;

        let mut preorder = Vec::new();
        let mut stack = vec![top];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if node.is_leaf() {
                continue;
            }
            preorder.push(id);
            stack.extend(node.left.into_iter().chain(node.right));
        }

        let mut changes = Vec::new();
        for &id in preorder.iter().rev() {
            if let Some(change) = self.refresh(id) {
                if matches!(self.nodes[id.index()].kind, NodeKind::Root) {
                    changes.push(change);
                }
            }
        }
        Ok(changes)
    }

    fn input_state(&self, input: Option<NodeId>) -> NodeState {
        input.map_or(NodeState::Unknown, |id| self.nodes[id.index()].state)
    }

    fn refresh(&mut self, id: NodeId) -> Option<StateChange> {
        let node = &self.nodes[id.index()];
        let from = node.state;
        let to = node.derive(self.input_state(node.left), self.input_state(node.right));
        if from == to {
            return None;
        }
        self.nodes[id.index()].state = to;
        Some(StateChange { node: id, from, to })
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Deep structural comparison of two (possibly empty) subtrees, which may
    /// live in different networks. Leaves compare by fact.
    #[must_use]
    pub fn same_structure(&self, a: Option<NodeId>, other: &Network, b: Option<NodeId>) -> bool {
        let mut stack = vec![(a, b)];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    let (Some(x), Some(y)) = (self.get(a), other.get(b)) else {
                        return false;
                    };
                    if x.kind != y.kind {
                        return false;
                    }
                    stack.push((x.left, y.left));
                    stack.push((x.right, y.right));
                }
                _ => return false,
            }
        }
        true
    }

    /// Compares only the concrete kinds of two nodes, ignoring children and
    /// leaf symbols.
    #[must_use]
    pub fn same_kind(&self, a: NodeId, other: &Network, b: NodeId) -> bool {
        match (self.get(a), other.get(b)) {
            (Some(x), Some(y)) => x.kind.same_variant(&y.kind),
            _ => false,
        }
    }

    /// Allocates an unattached copy of a node in this network.
    ///
    /// A join copies to an empty join of the same kind; a leaf copies its
    /// fact. States start unknown.
    ///
    /// # Errors
    /// Returns an error if the id does not belong to this network.
    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId> {
        let kind = self.node(id)?.kind.clone();
        Ok(self.add(kind))
    }

    /// Like [`duplicate`](Self::duplicate), allocating the copy in `target`.
    ///
    /// # Errors
    /// Returns an error if the id does not belong to this network.
    pub fn duplicate_into(&self, id: NodeId, target: &mut Network) -> Result<NodeId> {
        let kind = self.node(id)?.kind.clone();
        Ok(target.add(kind))
    }

    /// Walks a right-leaning chain: `[node, node.left]`, then continues at
    /// `node.right` until a leaf.
    #[must_use]
    pub fn depth_first(&self, start: Option<NodeId>) -> DepthFirst<'_> {
        DepthFirst {
            network: self,
            next: start,
            left: None,
        }
    }

    /// Renders a subtree as `and(wet, or(june, july))`. Empty slots render
    /// as `_`.
    #[must_use]
    pub fn render(&self, id: Option<NodeId>) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, mut id: Option<NodeId>, out: &mut String) {
        // Chains nest to the right, so walk that side in a loop
        let mut open = 0;
        loop {
            let Some(node) = id.and_then(|id| self.get(id)) else {
                out.push('_');
                break;
            };
            match &node.kind {
                NodeKind::Leaf(fact) => {
                    out.push_str(fact.as_str());
                    break;
                }
                NodeKind::Root => id = node.right,
                kind => {
                    out.push_str(kind.name());
                    out.push('(');
                    self.render_into(node.left, out);
                    out.push_str(", ");
                    open += 1;
                    id = node.right;
                }
            }
        }
        for _ in 0..open {
            out.push(')');
        }
    }
}

/// Iterator returned by [`Network::depth_first`].
pub struct DepthFirst<'a> {
    network: &'a Network,
    next: Option<NodeId>,
    left: Option<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if let Some(left) = self.left.take() {
            return Some(left);
        }
        let id = self.next.take()?;
        let node = self.network.get(id)?;
        if !node.is_leaf() {
            self.left = node.left;
            self.next = node.right;
        }
        Some(id)
    }
}

// =============================================================================
// Tests
// =============================================================================
