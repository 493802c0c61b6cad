//! Persistent fact sets with structural sharing.
//!
//! [`FactSet`] is a thin wrapper around `im::OrdSet`, so working-memory
//! snapshots handed out by the engine are O(1) to clone and iterate in a
//! deterministic (lexicographic) order.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fact::Fact;

/// Persistent ordered set of facts.
///
/// Modifications return a new set sharing structure with the original.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactSet(im::OrdSet<Fact>);

impl FactSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdSet::new())
    }

    /// Returns the number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set contains the fact, in any spelling.
    #[must_use]
    pub fn contains(&self, fact: impl Into<Fact>) -> bool {
        self.0.contains(&fact.into())
    }

    /// Returns a new set with the fact inserted.
    #[must_use]
    pub fn insert(&self, fact: impl Into<Fact>) -> Self {
        let mut new = self.0.clone();
        new.insert(fact.into());
        Self(new)
    }

    /// Returns a new set with the fact removed.
    #[must_use]
    pub fn remove(&self, fact: impl Into<Fact>) -> Self {
        let mut new = self.0.clone();
        new.remove(&fact.into());
        Self(new)
    }

    /// Returns an iterator over the facts in order.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.0.iter()
    }

    /// Returns a new set that is the union of this set and another.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.clone().union(other.0.clone()))
    }

    /// Returns a new set with the facts of this set that are not in another.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.clone().relative_complement(other.0.clone()))
    }
}

impl fmt::Debug for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, fact) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{fact}")?;
        }
        write!(f, "}}")
    }
}

impl PartialEq for FactSet {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for FactSet {}

impl Hash for FactSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Ordered iteration makes this order-independent for equal sets
        self.len().hash(state);
        for fact in self.iter() {
            fact.hash(state);
        }
    }
}

impl<F: Into<Fact>> FromIterator<F> for FactSet {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<F: Into<Fact>, const N: usize> From<[F; N]> for FactSet {
    fn from(facts: [F; N]) -> Self {
        facts.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a FactSet {
    type Item = &'a Fact;
    type IntoIter = im::ordset::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
