//! Working memory and the pending-change queues.
//!
//! Asserting, retracting or reasserting a fact updates the fact set at once
//! and queues the fact for the next fixpoint pass. The three queues are kept
//! disjoint: a later request for the same fact replaces an earlier one, so a
//! pass never sets the same leaf in two directions.

use std::collections::BTreeSet;

use ripple_foundation::{Fact, FactSet};

/// The engine's fact set plus the facts waiting to reach the network.
#[derive(Clone, Debug, Default)]
pub struct WorkingMemory {
    facts: FactSet,
    added: BTreeSet<Fact>,
    removed: BTreeSet<Fact>,
    forced: BTreeSet<Fact>,
}

impl WorkingMemory {
    /// Creates an empty working memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current facts.
    #[must_use]
    pub fn facts(&self) -> &FactSet {
        &self.facts
    }

    /// Whether `fact` is currently present.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.contains(fact)
    }

    /// Adds a fact and queues it to be set true.
    ///
    /// A fact already queued to be forced stays there; forcing sets it true
    /// anyway.
    pub fn assert(&mut self, fact: Fact) {
        self.facts = self.facts.insert(&fact);
        self.removed.remove(&fact);
        if !self.forced.contains(&fact) {
            self.added.insert(fact);
        }
    }

    /// Removes a fact and queues it to be set false.
    pub fn unassert(&mut self, fact: Fact) {
        self.facts = self.facts.remove(&fact);
        self.added.remove(&fact);
        self.forced.remove(&fact);
        self.removed.insert(fact);
    }

    /// Adds a fact and queues it to be set false then true again, so rules
    /// that depend on it fire even if it was already present.
    pub fn reassert(&mut self, fact: Fact) {
        self.facts = self.facts.insert(&fact);
        self.added.remove(&fact);
        self.removed.remove(&fact);
        self.forced.insert(fact);
    }

    /// Facts queued to be set true.
    #[must_use]
    pub fn added(&self) -> &BTreeSet<Fact> {
        &self.added
    }

    /// Facts queued to be set false.
    #[must_use]
    pub fn removed(&self) -> &BTreeSet<Fact> {
        &self.removed
    }

    /// Facts queued to be forced.
    #[must_use]
    pub fn forced(&self) -> &BTreeSet<Fact> {
        &self.forced
    }

    /// Whether any queue holds a fact.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.forced.is_empty())
    }

    /// Total number of queued facts.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.added.len() + self.removed.len() + self.forced.len()
    }

    /// Every queued fact, in order.
    #[must_use]
    pub fn pending(&self) -> Vec<Fact> {
        let mut pending: Vec<Fact> = self
            .removed
            .iter()
            .chain(&self.added)
            .chain(&self.forced)
            .cloned()
            .collect();
        pending.sort_unstable();
        pending
    }

    pub(crate) fn take_removed(&mut self) -> BTreeSet<Fact> {
        std::mem::take(&mut self.removed)
    }

    pub(crate) fn take_added(&mut self) -> BTreeSet<Fact> {
        std::mem::take(&mut self.added)
    }

    pub(crate) fn take_forced(&mut self) -> BTreeSet<Fact> {
        std::mem::take(&mut self.forced)
    }
}
