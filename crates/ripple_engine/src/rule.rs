//! Rules and the rule builder.
//!
//! A rule ties the virtual root of one condition tree to its consequences:
//! the action facts it asserts while its condition holds (and retracts when
//! the condition stops holding), and an optional callback that receives each
//! new state.

use std::fmt;

use ripple_foundation::{Fact, NodeId, RuleId};
use ripple_network::{Network, TreeCursor};

use crate::inferer::Inferer;

/// Callback invoked with a rule's new state.
pub type Callback = Box<dyn FnMut(bool)>;

// =============================================================================
// Rule
// =============================================================================

/// A registered rule.
pub struct Rule {
    pub(crate) id: RuleId,
    pub(crate) name: Option<String>,
    pub(crate) cursor: TreeCursor,
    pub(crate) actions: Vec<Fact>,
    pub(crate) callback: Option<Callback>,
    /// False until the rule's joins have been evaluated against the leaves.
    pub(crate) settled: bool,
}

impl Rule {
    pub(crate) fn new(id: RuleId, cursor: TreeCursor) -> Self {
        Self {
            id,
            name: None,
            cursor,
            actions: Vec::new(),
            callback: None,
            settled: false,
        }
    }

    /// The rule's id.
    #[must_use]
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// The rule's name, if it was given one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name, or the id when unnamed. Used in logs and error context.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }

    /// The construction cursor of the rule's condition.
    #[must_use]
    pub fn cursor(&self) -> &TreeCursor {
        &self.cursor
    }

    /// The condition's virtual root, whose transitions drive the rule.
    #[must_use]
    pub fn sub_root(&self) -> NodeId {
        self.cursor.sub_root()
    }

    /// Facts asserted while the condition holds.
    #[must_use]
    pub fn actions(&self) -> &[Fact] {
        &self.actions
    }

    /// Whether a callback is registered.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Renders the rule as `name: condition => actions`.
    #[must_use]
    pub fn display<'a>(&'a self, network: &'a Network) -> RuleDisplay<'a> {
        RuleDisplay {
            rule: self,
            network,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("sub_root", &self.cursor.sub_root())
            .field("actions", &self.actions)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

/// [`Display`](fmt::Display) adapter returned by [`Rule::display`].
pub struct RuleDisplay<'a> {
    rule: &'a Rule,
    network: &'a Network,
}

impl fmt::Display for RuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let condition = self.network.render(self.rule.cursor.root(self.network));
        write!(f, "{}: {condition} =>", self.rule.label())?;
        if self.rule.actions.is_empty() {
            return f.write_str(" ()");
        }
        for (i, fact) in self.rule.actions.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{fact}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Rule Builder
// =============================================================================

/// Chaining builder returned by [`Inferer::when`].
///
/// The rule is registered as soon as the builder is created; each method
/// edits it in place.
///
/// ```
/// use ripple_engine::Inferer;
///
/// let mut engine = Inferer::new();
/// let rule = engine
///     .when("winter")
///     .and("no_money")
///     .implies(["in_doors"])
///     .named("stay in")
///     .id();
///
/// assert_eq!(engine.rule(rule).unwrap().name(), Some("stay in"));
/// ```
pub struct RuleBuilder<'a> {
    engine: &'a mut Inferer,
    id: RuleId,
}

// Dropping the builder is the normal way to finish a rule
#[allow(clippy::return_self_not_must_use)]
impl<'a> RuleBuilder<'a> {
    pub(crate) fn new(engine: &'a mut Inferer, id: RuleId) -> Self {
        Self { engine, id }
    }

    /// Appends `AND fact` to the condition.
    pub fn and(self, fact: impl Into<Fact>) -> Self {
        self.engine.extend_rule(self.id, Connective::And, &fact.into());
        self
    }

    /// Appends `OR fact` to the condition.
    pub fn or(self, fact: impl Into<Fact>) -> Self {
        self.engine.extend_rule(self.id, Connective::Or, &fact.into());
        self
    }

    /// Adds facts to assert while the condition holds.
    pub fn implies<I, F>(self, facts: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fact>,
    {
        self.engine
            .rule_mut(self.id)
            .actions
            .extend(facts.into_iter().map(Into::into));
        self
    }

    /// Sets the callback invoked with every observable state change.
    pub fn on_change(self, callback: impl FnMut(bool) + 'static) -> Self {
        self.engine.rule_mut(self.id).callback = Some(Box::new(callback));
        self
    }

    /// Names the rule.
    pub fn named(self, name: impl Into<String>) -> Self {
        self.engine.rule_mut(self.id).name = Some(name.into());
        self
    }

    /// The id of the rule being built.
    #[must_use]
    pub fn id(&self) -> RuleId {
        self.id
    }
}

/// How a new operand joins a rule's condition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Connective {
    And,
    Or,
}
