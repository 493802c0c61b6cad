//! Ripple - Forward-chaining inference over a boolean propagation network
//!
//! This crate re-exports all layers of the Ripple system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: ripple_engine     - Rules, fixpoint inference, working memory, trace
//! Layer 1: ripple_network    - Node arena, propagation, condition trees, leaf cache
//! Layer 0: ripple_foundation - Core types (Fact, FactSet, NodeId, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use ripple::engine::Inferer;
//!
//! let mut engine = Inferer::new();
//! engine.when("wet").implies(["raining"]);
//! engine.when("raining").and("cold").implies(["winter"]);
//! engine.when("winter").and("no_money").implies(["in_doors"]);
//! engine.when("in_doors").and("have_beer").or("good_tv").implies(["good_times"]);
//!
//! engine.assert(["wet", "cold", "no_money", "have_beer"]);
//! let facts = engine.infer().unwrap();
//! assert!(facts.contains("good_times"));
//! ```

pub use ripple_engine as engine;
pub use ripple_foundation as foundation;
pub use ripple_network as network;
