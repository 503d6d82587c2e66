use crate::backward::{backward_chain, ProofNode};
use crate::consistency::{find_fact_incoherence, find_rule_incoherence, FactIncoherence};
use crate::forward::forward_chain;
use crate::grouping::{resolve_by_groups, rule_groups};
use crate::trace::{NoTrace, Tracer};
use crate::{
    loader, EngineConfig, EngineResult, FactBase, ForwardOutcome, Goal, GroupedOutcome,
    KnowledgeBase, RuleIncoherenceReport, RuleSet,
};
use tracing::info;

/// The chaining engine.
///
/// Holds one knowledge base and the run settings. Every run works on its own
/// copy of the rules and facts, so runs never influence each other.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    knowledge: KnowledgeBase,
    config: EngineConfig,
}

impl Engine {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self {
            knowledge,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with custom settings
    pub fn with_config(knowledge: KnowledgeBase, config: EngineConfig) -> Self {
        Self { knowledge, config }
    }

    /// Build an engine from JSON knowledge-base text
    pub fn from_json(text: &str, source_id: &str) -> EngineResult<Self> {
        Ok(Self::new(loader::load_json(text, source_id)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn rules(&self) -> &RuleSet {
        &self.knowledge.rules
    }

    pub fn facts(&self) -> &FactBase {
        &self.knowledge.facts
    }

    pub fn forward(&self, goal: Option<&Goal>) -> EngineResult<ForwardOutcome> {
        self.forward_traced(goal, &mut NoTrace)
    }

    /// Forward chaining with the configured firing and ordering strategies
    pub fn forward_traced(
        &self,
        goal: Option<&Goal>,
        tracer: &mut dyn Tracer,
    ) -> EngineResult<ForwardOutcome> {
        self.ensure_facts_coherent()?;
        info!(
            firing = %self.config.firing,
            ordering = %self.config.ordering,
            goal = ?goal.map(Goal::to_string),
            "forward chaining"
        );
        forward_chain(
            self.knowledge.rules.clone(),
            self.knowledge.facts.clone(),
            self.config.firing,
            self.config.ordering,
            goal,
            tracer,
        )
    }

    pub fn backward(&self, goal: &Goal) -> EngineResult<(bool, ProofNode)> {
        self.backward_traced(goal, &mut NoTrace)
    }

    /// Backward chaining with the configured ordering strategy
    pub fn backward_traced(
        &self,
        goal: &Goal,
        tracer: &mut dyn Tracer,
    ) -> EngineResult<(bool, ProofNode)> {
        self.ensure_facts_coherent()?;
        info!(ordering = %self.config.ordering, %goal, "backward chaining");
        Ok(backward_chain(
            &self.knowledge.rules,
            &self.knowledge.facts,
            goal,
            self.config.ordering,
            tracer,
        ))
    }

    pub fn grouped(&self, goal: Option<&Goal>) -> EngineResult<GroupedOutcome> {
        self.grouped_traced(goal, &mut NoTrace)
    }

    /// Resolution by dependency-ordered rule groups
    pub fn grouped_traced(
        &self,
        goal: Option<&Goal>,
        tracer: &mut dyn Tracer,
    ) -> EngineResult<GroupedOutcome> {
        self.ensure_facts_coherent()?;
        info!(goal = ?goal.map(Goal::to_string), "grouped resolution");
        resolve_by_groups(
            &self.knowledge.rules,
            self.knowledge.facts.clone(),
            goal,
            tracer,
        )
    }

    /// The rule group sequence for the current facts
    pub fn groups(&self) -> EngineResult<Vec<Vec<String>>> {
        rule_groups(&self.knowledge.rules, &self.knowledge.facts)
    }

    /// Structural rule check with the configured strictness
    pub fn check_rules(&self) -> RuleIncoherenceReport {
        find_rule_incoherence(&self.knowledge.rules, self.config.strictness)
    }

    /// First contradiction between the rules and the facts, if any
    pub fn check_facts(&self) -> Option<FactIncoherence> {
        find_fact_incoherence(
            &self.knowledge.rules,
            &self.knowledge.facts,
            self.config.ordering,
        )
    }

    fn ensure_facts_coherent(&self) -> EngineResult<()> {
        if !self.config.check_facts_first {
            return Ok(());
        }
        match self.check_facts() {
            Some(found) => Err(found.into()),
            None => Ok(()),
        }
    }
}
