//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Fact, FactSet, identifiers, and Error.

mod errors;
