//! Three-valued node state.
//!
//! Nodes start out [`NodeState::Unknown`] and only resolve to true or false
//! once a propagating mutation reaches them. Joins combine states with Kleene
//! logic, so an AND with one false input is false even if the other input is
//! still unknown.

use std::fmt;

/// The truth state of a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Not yet reached by any propagating mutation.
    #[default]
    Unknown,
    /// Known false.
    False,
    /// Known true.
    True,
}

impl NodeState {
    /// Kleene conjunction.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    /// Kleene disjunction.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Unknown,
        }
    }

    /// Returns the known boolean value, if any.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::False => Some(false),
            Self::True => Some(true),
        }
    }

    /// Returns true only for [`NodeState::True`].
    #[must_use]
    pub fn is_true(self) -> bool {
        self == Self::True
    }

    /// Returns true unless the state is [`NodeState::Unknown`].
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl From<bool> for NodeState {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for NodeState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unknown, Self::from)
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::False => write!(f, "false"),
            Self::True => write!(f, "true"),
        }
    }
}
