//! Boolean propagation network and condition trees for Ripple.
//!
//! This crate provides:
//! - [`NodeState`] - Three-valued (unknown/false/true) node state
//! - [`Network`] - Arena of leaf and join nodes with work-list propagation
//! - [`TreeCursor`] - Right-nested AND/OR chain construction inside a network
//! - [`ConditionsTree`] - A standalone condition tree with its own arena
//! - [`SymbolTable`] - Per-engine cache of one leaf per fact symbol
//!
//! # Propagation
//!
//! ```text
//! fact leaf ──┐
//!             ├─ and ──┐
//! fact leaf ──┘        ├─ or ── root ──> state change
//! fact leaf ───────────┘
//! ```
//!
//! Setting a leaf walks its listeners breadth-first. Each join recomputes
//! from both inputs and, if its state moved, enqueues its own listeners.
//! Root nodes report their transitions back to the caller instead of
//! propagating further.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod network;
pub mod node;
pub mod state;
pub mod symbols;
pub mod tree;

pub use network::{DepthFirst, Network, Side, StateChange};
pub use node::{Node, NodeKind};
pub use state::NodeState;
pub use symbols::SymbolTable;
pub use tree::{ConditionsTree, TreeCursor};
