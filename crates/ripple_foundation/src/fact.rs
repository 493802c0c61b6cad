//! Canonical fact symbols.
//!
//! A fact is an atomic named proposition. Different spellings of the same
//! symbol (`wet`, `:wet`, `" wet "`) canonicalize to one [`Fact`], so that
//! equality, hashing, and the engine's leaf cache all agree on identity.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A canonical fact symbol.
///
/// Cloning is O(1); the symbol text is shared.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct Fact(Arc<str>);

impl Fact {
    /// Creates a fact from any symbol spelling, canonicalizing it.
    #[must_use]
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(Arc::from(Self::canonicalize(symbol.as_ref())))
    }

    /// Returns the canonical form of a symbol spelling.
    ///
    /// Surrounding whitespace and every leading `:` are stripped, so the
    /// canonical form of a canonical symbol is itself. Nothing is ever
    /// rejected; an empty symbol is a valid (if unusual) fact.
    #[must_use]
    pub fn canonicalize(symbol: &str) -> &str {
        symbol
            .trim_end()
            .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
    }

    /// Returns the canonical symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fact {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Fact {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fact {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<String> for Fact {
    fn from(symbol: String) -> Self {
        if Self::canonicalize(&symbol).len() == symbol.len() {
            return Self(Arc::from(symbol));
        }
        Self::new(symbol)
    }
}

impl From<&String> for Fact {
    fn from(symbol: &String) -> Self {
        Self::new(symbol)
    }
}

impl From<&Fact> for Fact {
    fn from(fact: &Fact) -> Self {
        fact.clone()
    }
}

impl From<Fact> for String {
    fn from(fact: Fact) -> Self {
        fact.0.to_string()
    }
}

macro_rules! fact_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Fact {
                fn from(value: $ty) -> Self {
                    Self::new(value.to_string())
                }
            }
        )*
    };
}

fact_from_display!(char, i32, i64, u32, u64, usize);
