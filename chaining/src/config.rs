use crate::consistency::Strictness;
use crate::{FiringStrategy, OrderingStrategy};

/// Settings shared by every engine run
///
/// Strategy fields are closed enums: names are validated when they are
/// parsed, never during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Conflict resolution for forward and backward chaining
    pub ordering: OrderingStrategy,

    /// Breadth or depth firing for forward chaining
    pub firing: FiringStrategy,

    /// Which derivation pairs the rule-level check reports
    pub strictness: Strictness,

    /// Refuse to run when the facts already contradict the rules
    pub check_facts_first: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ordering(mut self, ordering: OrderingStrategy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_firing(mut self, firing: FiringStrategy) -> Self {
        self.firing = firing;
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn checking_facts_first(mut self, enabled: bool) -> Self {
        self.check_facts_first = enabled;
        self
    }
}
