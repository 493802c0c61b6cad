//! Trace event and record types.

use std::fmt;

use ripple_foundation::{Fact, RuleId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Trace Event
// =============================================================================

/// Events recorded while the engine runs to a fixpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceEvent {
    /// `infer()` was called.
    InferStart {
        /// Number of facts pending across all three queues.
        pending: usize,
    },

    /// A fixpoint pass started.
    PassStart {
        /// Facts queued for removal.
        removed: usize,
        /// Facts queued for addition.
        added: usize,
        /// Facts queued to be forced.
        forced: usize,
    },

    /// A cached leaf was set.
    FactChanged {
        /// The leaf's fact.
        fact: Fact,
        /// Whether the fact became present.
        present: bool,
    },

    /// A rule's condition became true.
    RuleFired {
        /// The rule.
        rule: RuleId,
    },

    /// A rule's condition became false.
    RuleUnfired {
        /// The rule.
        rule: RuleId,
    },

    /// A rule changed state while callbacks were suspended.
    CallbackSuppressed {
        /// The rule.
        rule: RuleId,
        /// The state the callback would have received.
        state: bool,
    },

    /// A fixpoint pass ended.
    PassEnd,

    /// `infer()` returned.
    InferEnd {
        /// Passes run.
        passes: usize,
        /// Size of working memory afterwards.
        facts: usize,
        /// Whether the fixpoint was reached.
        success: bool,
    },
}

impl TraceEvent {
    /// Short machine-friendly name of the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::InferStart { .. } => "infer_start",
            Self::PassStart { .. } => "pass_start",
            Self::FactChanged { .. } => "fact_changed",
            Self::RuleFired { .. } => "rule_fired",
            Self::RuleUnfired { .. } => "rule_unfired",
            Self::CallbackSuppressed { .. } => "callback_suppressed",
            Self::PassEnd => "pass_end",
            Self::InferEnd { .. } => "infer_end",
        }
    }

    /// The rule this event concerns, if any.
    #[must_use]
    pub fn rule(&self) -> Option<RuleId> {
        match self {
            Self::RuleFired { rule }
            | Self::RuleUnfired { rule }
            | Self::CallbackSuppressed { rule, .. } => Some(*rule),
            _ => None,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InferStart { pending } => write!(f, "infer start ({pending} pending)"),
            Self::PassStart {
                removed,
                added,
                forced,
            } => write!(f, "pass start (-{removed} +{added} !{forced})"),
            Self::FactChanged { fact, present } => {
                let sign = if *present { '+' } else { '-' };
                write!(f, "{sign}{fact}")
            }
            Self::RuleFired { rule } => write!(f, "{rule} fired"),
            Self::RuleUnfired { rule } => write!(f, "{rule} unfired"),
            Self::CallbackSuppressed { rule, state } => {
                write!(f, "{rule} callback suppressed ({state})")
            }
            Self::PassEnd => f.write_str("pass end"),
            Self::InferEnd {
                passes,
                facts,
                success,
            } => {
                let outcome = if *success { "fixpoint" } else { "aborted" };
                write!(f, "infer end: {outcome} after {passes} passes, {facts} facts")
            }
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// One recorded event, stamped with where in the run it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceRecord {
    /// Monotonic record id.
    pub id: u64,
    /// Which call to `infer()` produced the record (1-based).
    pub inference: u64,
    /// Pass within that inference (0 before the first pass).
    pub pass: usize,
    /// The event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(id: u64, inference: u64, pass: usize, event: TraceEvent) -> Self {
        Self {
            id,
            inference,
            pass,
            event,
        }
    }

    /// See [`TraceEvent::event_type`].
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.{}] {}", self.inference, self.pass, self.event)
    }
}
