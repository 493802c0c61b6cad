//! Facts, fact sets, identifiers, and errors for Ripple.
//!
//! This crate provides:
//! - [`Fact`] - Canonical fact symbols
//! - [`FactSet`] - Persistent ordered set of facts (working memory snapshots)
//! - [`NodeId`] / [`RuleId`] - Stable arena indices
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod fact;
pub mod ids;

pub use collections::FactSet;
pub use error::{Error, ErrorContext, ErrorKind};
pub use fact::Fact;
pub use ids::{NodeId, RuleId};

/// Result type alias using Ripple's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
