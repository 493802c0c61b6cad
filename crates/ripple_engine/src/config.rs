//! Engine configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::trace::TraceConfig;

/// Default cap on fixpoint passes beyond the first.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Configuration for an [`Inferer`](crate::Inferer).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InfererConfig {
    /// Inference fails once it runs more than `max_iterations + 1` passes.
    pub max_iterations: usize,

    /// In-memory trace settings.
    pub trace: TraceConfig,
}

impl Default for InfererConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            trace: TraceConfig::default(),
        }
    }
}

impl InfererConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method to set the trace configuration.
    #[must_use]
    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = trace;
        self
    }

    /// The most passes one `infer()` call may run.
    #[must_use]
    pub fn pass_limit(&self) -> usize {
        self.max_iterations.saturating_add(1)
    }
}
