//! Bounded storage for trace records.

use std::collections::{HashMap, VecDeque};

use super::record::{TraceEvent, TraceRecord};

/// Default number of records kept.
pub const DEFAULT_BUFFER_SIZE: usize = 10_000;

// =============================================================================
// Trace Buffer
// =============================================================================

/// A ring buffer of the most recent trace records.
///
/// When full, the oldest record is dropped to make room. Record ids keep
/// increasing across evictions and [`clear`](Self::clear).
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    max_size: usize,
    next_id: u64,
}

impl TraceBuffer {
    /// Creates a buffer holding at most `max_size` records.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_size.min(1024)),
            max_size,
            next_id: 0,
        }
    }

    /// Appends an event and returns the id assigned to it.
    pub fn push(&mut self, inference: u64, pass: usize, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.max_size == 0 {
            return id;
        }
        if self.records.len() == self.max_size {
            self.records.pop_front();
        }
        self.records
            .push_back(TraceRecord::new(id, inference, pass, event));
        id
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Capacity of the buffer.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterates records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Records produced by one call to `infer()`.
    #[must_use]
    pub fn records_for_inference(&self, inference: u64) -> Vec<&TraceRecord> {
        self.filter(|r| r.inference == inference)
    }

    /// The most recent `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).collect()
    }

    /// Records matching `predicate`.
    pub fn filter<F>(&self, predicate: F) -> Vec<&TraceRecord>
    where
        F: Fn(&TraceRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Records whose [`TraceEvent::event_type`] is `event_type`.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.filter(|r| r.event_type() == event_type)
    }

    /// Counts per event type.
    #[must_use]
    pub fn event_counts(&self) -> HashMap<&'static str, usize> {
        let mut counts = HashMap::new();
        for record in &self.records {
            *counts.entry(record.event_type()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}
