use crate::{FactBase, RuleSet};
use serde::Serialize;

/// Why a forward-chaining run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// No goal was given and no rule is left to fire
    Saturated,
    /// The goal holds in the final facts
    GoalReached,
    /// A goal was given but nothing more can fire and it does not hold
    NoProgress,
}

/// Result of a forward-chaining run
///
/// Owns the facts and the pool the run was given, in their final state.
#[derive(Debug, Clone, Serialize)]
pub struct ForwardOutcome {
    pub facts: FactBase,
    /// Rules that never fired
    pub remaining: RuleSet,
    /// Rule ids in firing order
    pub fired: Vec<String>,
    pub rounds: usize,
    pub termination: Termination,
    /// `Some` only when a goal was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_reached: Option<bool>,
}

/// Result of grouped resolution
#[derive(Debug, Clone, Serialize)]
pub struct GroupedOutcome {
    pub facts: FactBase,
    /// The full group sequence, whether or not every group was applied
    pub groups: Vec<Vec<String>>,
    /// Number of leading groups that were applied before stopping
    pub applied_groups: usize,
    pub fired: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_reached: Option<bool>,
}
