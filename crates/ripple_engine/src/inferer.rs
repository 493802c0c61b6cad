//! The forward-chaining engine.
//!
//! An [`Inferer`] owns one propagation network, the rules wired into it and
//! the working memory. Facts change through [`assert`](Inferer::assert),
//! [`unassert`](Inferer::unassert) and [`reassert`](Inferer::reassert),
//! which only queue work. [`infer`](Inferer::infer) then drains the queues
//! pass by pass:
//!
//! 1. queued removals set their leaves false
//! 2. queued additions set their leaves true
//! 3. queued forced facts set their leaves false with callbacks suspended,
//!    then true again
//!
//! Rules whose conditions change state assert or retract their action
//! facts, which queues more work for the next pass. Inference stops when
//! nothing is queued, or fails once it has run more than
//! `max_iterations + 1` passes.

use std::collections::HashMap;

use ripple_foundation::{Error, ErrorContext, Fact, FactSet, NodeId, Result, RuleId};
use ripple_network::{ConditionsTree, Network, NodeState, StateChange, SymbolTable, TreeCursor};
use tracing::{debug, trace, warn};

use crate::config::InfererConfig;
use crate::memory::WorkingMemory;
use crate::rule::{Connective, Rule, RuleBuilder, RuleDisplay};
use crate::trace::{TraceEvent, Tracer};

// =============================================================================
// Inferer
// =============================================================================

/// A forward-chaining inference engine.
///
/// ```
/// use ripple_engine::Inferer;
///
/// let mut engine = Inferer::new();
/// engine.when("wet").implies(["raining"]);
/// engine.when("raining").and("cold").implies(["winter"]);
///
/// engine.assert(["wet", "cold"]);
/// let facts = engine.infer().unwrap();
/// assert!(facts.contains("winter"));
/// ```
pub struct Inferer {
    config: InfererConfig,
    network: Network,
    symbols: SymbolTable,
    rules: Vec<Rule>,
    /// Virtual root of each rule's condition, mapped back to the rule.
    roots: HashMap<NodeId, RuleId>,
    memory: WorkingMemory,
    callbacks_suspended: bool,
    tracer: Tracer,
    inferences: u64,
    last_fired: Option<RuleId>,
}

impl Default for Inferer {
    fn default() -> Self {
        Self::new()
    }
}

impl Inferer {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(InfererConfig::default())
    }

    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: InfererConfig) -> Self {
        let tracer = Tracer::new(&config.trace);
        Self {
            config,
            network: Network::new(),
            symbols: SymbolTable::new(),
            rules: Vec::new(),
            roots: HashMap::new(),
            memory: WorkingMemory::new(),
            callbacks_suspended: false,
            tracer,
            inferences: 0,
            last_fired: None,
        }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &InfererConfig {
        &self.config
    }

    /// The iteration cap.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.config.max_iterations
    }

    /// Changes the iteration cap.
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.config.max_iterations = max_iterations;
    }

    // =========================================================================
    // Rule Registration
    // =========================================================================

    /// Registers a rule whose condition starts with `fact`.
    ///
    /// The returned builder extends the condition and sets the rule's
    /// consequences.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` rules are registered.
    pub fn when(&mut self, fact: impl Into<Fact>) -> RuleBuilder<'_> {
        let leaf = self.leaf_for(&fact.into());
        let cursor = TreeCursor::when(&mut self.network, leaf).expect("cached leaf exists");
        let id = self.register(cursor);
        RuleBuilder::new(self, id)
    }

    /// Registers a rule whose condition is a copy of a standalone tree.
    ///
    /// Leaves are resolved through this engine's leaf cache, so they are
    /// shared with every other rule on the same facts. Joins are copied.
    /// The tree's own state-change callback is not carried over.
    ///
    /// # Errors
    /// Returns `InvalidNodeConstruction` if the tree cannot be replayed.
    pub fn when_conditions(&mut self, tree: &ConditionsTree) -> Result<RuleBuilder<'_>> {
        let mut cursor = TreeCursor::new(&mut self.network);
        for id in tree.iter() {
            let copy = match tree.node(id)?.fact() {
                Some(fact) => self.leaf_for(fact),
                None => tree.network().duplicate_into(id, &mut self.network)?,
            };
            cursor.append(&mut self.network, copy)?;
        }
        let id = self.register(cursor);
        Ok(RuleBuilder::new(self, id))
    }

    fn register(&mut self, cursor: TreeCursor) -> RuleId {
        let index = u32::try_from(self.rules.len()).expect("too many rules");
        let id = RuleId::new(index);
        self.roots.insert(cursor.sub_root(), id);
        self.rules.push(Rule::new(id, cursor));
        id
    }

    pub(crate) fn rule_mut(&mut self, id: RuleId) -> &mut Rule {
        &mut self.rules[id.index()]
    }

    pub(crate) fn extend_rule(&mut self, id: RuleId, connective: Connective, fact: &Fact) {
        let leaf = self.leaf_for(fact);
        let rule = &mut self.rules[id.index()];
        let joined = match connective {
            Connective::And => rule.cursor.and_node(&mut self.network, leaf),
            Connective::Or => rule.cursor.or_node(&mut self.network, leaf),
        };
        joined.expect("cached leaf exists");
        rule.settled = false;
    }

    /// Resolves the shared leaf for `fact`, creating it on first use with a
    /// state that mirrors working memory.
    fn leaf_for(&mut self, fact: &Fact) -> NodeId {
        let initial = NodeState::from(self.memory.contains(fact));
        self.symbols.resolve(&mut self.network, fact, initial)
    }

    /// The shared leaf for `fact`, created on first reference.
    pub fn pattern_node(&mut self, fact: impl Into<Fact>) -> NodeId {
        self.leaf_for(&fact.into())
    }

    // =========================================================================
    // Working Memory
    // =========================================================================

    /// Adds facts to working memory and queues them for the next `infer()`.
    ///
    /// Asserting a fact that is already present changes nothing downstream.
    pub fn assert<I, F>(&mut self, facts: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fact>,
    {
        for fact in facts {
            self.memory.assert(fact.into());
        }
        self
    }

    /// Removes facts from working memory and queues the removal.
    pub fn unassert<I, F>(&mut self, facts: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fact>,
    {
        for fact in facts {
            self.memory.unassert(fact.into());
        }
        self
    }

    /// Adds facts and makes every rule depending on them fire again, even if
    /// the facts were already present.
    pub fn reassert<I, F>(&mut self, facts: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fact>,
    {
        for fact in facts {
            self.memory.reassert(fact.into());
        }
        self
    }

    /// The current facts.
    #[must_use]
    pub fn facts(&self) -> &FactSet {
        self.memory.facts()
    }

    /// Working memory, including the queued changes.
    #[must_use]
    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    // =========================================================================
    // Inference
    // =========================================================================

    /// Runs queued changes through the network until nothing new is learned.
    ///
    /// # Errors
    /// Returns `NonTerminatingInference` after more than `max_iterations + 1`
    /// passes. Working memory keeps every change made before the failure.
    #[tracing::instrument(level = "debug", skip(self), fields(rules = self.rules.len()))]
    pub fn infer(&mut self) -> Result<FactSet> {
        self.inferences += 1;
        self.tracer.begin_inference(self.inferences);
        let pending = self.memory.pending_len();
        self.tracer.record(|| TraceEvent::InferStart { pending });

        self.settle_rules()?;

        let limit = self.config.pass_limit();
        let mut passes = 0;
        while self.memory.has_pending() {
            passes += 1;
            self.tracer.set_pass(passes);
            self.run_pass(passes)?;

            if passes > limit {
                return Err(self.non_terminating(passes));
            }
        }

        let facts = self.memory.facts().len();
        debug!(passes, facts, "reached fixpoint");
        self.tracer.record(|| TraceEvent::InferEnd {
            passes,
            facts,
            success: true,
        });
        Ok(self.memory.facts().clone())
    }

    fn run_pass(&mut self, pass: usize) -> Result<()> {
        let (removed, added, forced) = (
            self.memory.removed().len(),
            self.memory.added().len(),
            self.memory.forced().len(),
        );
        debug!(pass, removed, added, forced, "fixpoint pass");
        self.tracer.record(|| TraceEvent::PassStart {
            removed,
            added,
            forced,
        });

        // Each queue is taken just before its step, so facts retracted by
        // the removal step are added in the same pass
        for fact in self.memory.take_removed() {
            self.set_leaf(&fact, false)?;
        }
        for fact in self.memory.take_added() {
            self.set_leaf(&fact, true)?;
        }
        for fact in self.memory.take_forced() {
            self.suspend_callbacks(|engine| engine.set_leaf(&fact, false))?;
            self.set_leaf(&fact, true)?;
        }

        self.tracer.record(|| TraceEvent::PassEnd);
        Ok(())
    }

    fn non_terminating(&mut self, passes: usize) -> Error {
        let max_iterations = self.config.max_iterations;
        let pending = self.memory.pending();
        warn!(
            max_iterations,
            passes,
            pending = pending.len(),
            "inference still learning new facts, giving up"
        );
        let facts = self.memory.facts().len();
        self.tracer.record(|| TraceEvent::InferEnd {
            passes,
            facts,
            success: false,
        });

        let mut context = ErrorContext::new().with_pending(pending);
        if let Some(rule) = self.last_fired {
            context = context.with_rule(self.rules[rule.index()].label());
        }
        Error::non_terminating(max_iterations, passes).with_context(context)
    }

    /// Evaluates rules whose conditions changed shape since the last run.
    fn settle_rules(&mut self) -> Result<()> {
        for index in 0..self.rules.len() {
            let rule = &mut self.rules[index];
            if rule.settled {
                continue;
            }
            rule.settled = true;
            let changes = self.network.evaluate(rule.cursor.sub_root())?;
            self.dispatch(changes);
        }
        Ok(())
    }

    /// Sets the cached leaf of `fact`, if any, and reacts to the result.
    fn set_leaf(&mut self, fact: &Fact, present: bool) -> Result<()> {
        let Some(leaf) = self.symbols.get(fact) else {
            return Ok(());
        };
        if self.network.state(leaf)? == NodeState::from(present) {
            return Ok(());
        }

        self.tracer.record(|| TraceEvent::FactChanged {
            fact: fact.clone(),
            present,
        });
        let changes = self.network.set_state(leaf, present)?;
        self.dispatch(changes);
        Ok(())
    }

    /// Applies rule consequences for each observable root transition.
    fn dispatch(&mut self, changes: Vec<StateChange>) {
        for change in changes {
            if !change.is_observable() {
                continue;
            }
            let Some(&id) = self.roots.get(&change.node) else {
                continue;
            };
            let fired = change.fired();
            let rule = &mut self.rules[id.index()];
            trace!(rule = %rule.label(), fired, "rule changed state");

            for fact in &rule.actions {
                if fired {
                    self.memory.assert(fact.clone());
                } else {
                    self.memory.unassert(fact.clone());
                }
            }
            if fired {
                self.last_fired = Some(id);
                self.tracer.record(|| TraceEvent::RuleFired { rule: id });
            } else {
                self.tracer.record(|| TraceEvent::RuleUnfired { rule: id });
            }

            if let Some(callback) = rule.callback.as_mut() {
                if self.callbacks_suspended {
                    self.tracer.record(|| TraceEvent::CallbackSuppressed {
                        rule: id,
                        state: fired,
                    });
                } else {
                    callback(fired);
                }
            }
        }
    }

    // =========================================================================
    // Callback Suspension
    // =========================================================================

    /// Runs `f` with rule callbacks suspended.
    ///
    /// Facts are still asserted and retracted while suspended; only the
    /// callbacks are skipped. The previous suspension state is restored
    /// afterwards, so calls nest.
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use ripple_engine::Inferer;
    ///
    /// let calls = Rc::new(Cell::new(0));
    /// let seen = Rc::clone(&calls);
    ///
    /// let mut engine = Inferer::new();
    /// engine.when("wet").implies(["raining"]).on_change(move |_| seen.set(seen.get() + 1));
    /// engine.assert(["wet"]);
    ///
    /// let facts = engine.suspend_callbacks(|engine| engine.infer()).unwrap();
    /// assert!(facts.contains("raining"));
    /// assert_eq!(calls.get(), 0);
    /// ```
    pub fn suspend_callbacks<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let prior = std::mem::replace(&mut self.callbacks_suspended, true);
        let result = f(self);
        self.callbacks_suspended = prior;
        result
    }

    /// Whether callbacks are currently suspended.
    #[must_use]
    pub fn callbacks_suspended(&self) -> bool {
        self.callbacks_suspended
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Gets a rule.
    ///
    /// # Errors
    /// Returns `UnknownRule` if the id was not issued by this engine.
    pub fn rule(&self, id: RuleId) -> Result<&Rule> {
        self.rules.get(id.index()).ok_or_else(|| Error::unknown_rule(id))
    }

    /// Iterates rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// The state of a rule's condition.
    ///
    /// # Errors
    /// Returns `UnknownRule` for foreign ids.
    pub fn rule_state(&self, id: RuleId) -> Result<NodeState> {
        let rule = self.rule(id)?;
        self.network.state(rule.sub_root())
    }

    /// Whether a rule's condition currently holds.
    ///
    /// # Errors
    /// Returns `UnknownRule` for foreign ids.
    pub fn fired(&self, id: RuleId) -> Result<bool> {
        Ok(self.rule_state(id)?.is_true())
    }

    /// The real root of a rule's condition.
    ///
    /// # Errors
    /// Returns `UnknownRule` for foreign ids.
    pub fn condition_root(&self, id: RuleId) -> Result<Option<NodeId>> {
        Ok(self.rule(id)?.cursor.root(&self.network))
    }

    /// Renders a rule as `name: condition => actions`.
    ///
    /// # Errors
    /// Returns `UnknownRule` for foreign ids.
    pub fn display_rule(&self, id: RuleId) -> Result<RuleDisplay<'_>> {
        Ok(self.rule(id)?.display(&self.network))
    }

    /// The shared network.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The leaf cache.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The inference trace.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Mutable access to the inference trace, to toggle or clear it.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Number of completed or attempted `infer()` calls.
    #[must_use]
    pub fn inferences(&self) -> u64 {
        self.inferences
    }
}

impl std::fmt::Debug for Inferer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inferer")
            .field("config", &self.config)
            .field("rules", &self.rules.len())
            .field("nodes", &self.network.len())
            .field("facts", self.memory.facts())
            .field("callbacks_suspended", &self.callbacks_suspended)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
