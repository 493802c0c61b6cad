//! Rules, forward-chaining inference, and tracing for Ripple.
//!
//! This crate provides:
//! - [`Inferer`] - Working memory, rule registration, and the fixpoint loop
//! - [`Rule`] / [`RuleBuilder`] - Conditions bound to action facts and callbacks
//! - [`WorkingMemory`] - The fact set and its pending-change queues
//! - [`InfererConfig`] - Iteration cap and trace settings
//! - [`Tracer`] - Optional in-memory record of what inference did

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod inferer;
pub mod memory;
pub mod rule;
pub mod trace;

pub use config::{DEFAULT_MAX_ITERATIONS, InfererConfig};
pub use inferer::Inferer;
pub use memory::WorkingMemory;
pub use rule::{Callback, Rule, RuleBuilder, RuleDisplay};
pub use trace::{TraceBuffer, TraceConfig, TraceEvent, TraceRecord, Tracer};
