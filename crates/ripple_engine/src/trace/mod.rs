//! In-memory inference trace.
//!
//! When enabled, the engine records what each `infer()` call did: the passes
//! it ran, the leaves it set and the rules that fired. Records are kept in a
//! bounded [`TraceBuffer`]. A disabled tracer does no work at all; events are
//! built lazily only when recording is on.
//!
//! ```
//! use ripple_engine::{Inferer, InfererConfig, TraceConfig};
//!
//! let config = InfererConfig::default().with_trace(TraceConfig::new().enabled());
//! let mut engine = Inferer::with_config(config);
//! engine.when("wet").implies(["raining"]);
//! engine.assert(["wet"]);
//! engine.infer().unwrap();
//!
//! assert_eq!(engine.tracer().buffer().by_event_type("rule_fired").len(), 1);
//! ```

pub mod buffer;
pub mod record;

pub use buffer::{DEFAULT_BUFFER_SIZE, TraceBuffer};
pub use record::{TraceEvent, TraceRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Trace Configuration
// =============================================================================

/// Configuration for the inference trace.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraceConfig {
    /// Whether events are recorded.
    pub enabled: bool,
    /// Maximum records kept.
    pub buffer_size: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl TraceConfig {
    /// Creates the default (disabled) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable recording.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Builder method to set the buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Records trace events into a buffer, stamped with the current position.
#[derive(Clone, Debug)]
pub struct Tracer {
    enabled: bool,
    buffer: TraceBuffer,
    inference: u64,
    pass: usize,
}

impl Tracer {
    /// Creates a tracer from its configuration.
    #[must_use]
    pub fn new(config: &TraceConfig) -> Self {
        Self {
            enabled: config.enabled,
            buffer: TraceBuffer::new(config.buffer_size),
            inference: 0,
            pass: 0,
        }
    }

    /// Creates a tracer that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(&TraceConfig::default())
    }

    /// Whether events are being recorded.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Starts recording.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stops recording. Existing records are kept.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Marks the start of inference number `inference`.
    pub fn begin_inference(&mut self, inference: u64) {
        self.inference = inference;
        self.pass = 0;
    }

    /// Marks the start of a pass.
    pub fn set_pass(&mut self, pass: usize) {
        self.pass = pass;
    }

    /// Records the event built by `event`, if recording is on.
    ///
    /// Returns the record id when something was recorded.
    #[inline]
    pub fn record<F>(&mut self, event: F) -> Option<u64>
    where
        F: FnOnce() -> TraceEvent,
    {
        if !self.enabled {
            return None;
        }
        Some(self.buffer.push(self.inference, self.pass, event()))
    }

    /// The recorded events.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}
