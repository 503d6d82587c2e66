//! Trace events emitted by the engines
//!
//! A [`Tracer`] only observes: engines call it at fixed points and never read
//! anything back, so tracing cannot change the outcome of a run.

use crate::{Assignments, FactBase, Goal, RuleSet};

#[derive(Debug)]
pub enum TraceEvent<'a> {
    /// Forward chaining is about to order and fire `eligible`
    RoundStarted {
        round: usize,
        eligible: &'a [String],
        facts: &'a FactBase,
        remaining: &'a RuleSet,
    },
    /// A rule fired and its conclusion was asserted
    RuleFired {
        round: usize,
        rule: &'a str,
        conclusion: &'a Assignments,
    },
    /// Backward chaining found the goal among the facts
    GoalIsFact { goal: &'a Goal, depth: usize },
    /// No available rule concludes the goal
    GoalUnreachable { goal: &'a Goal, depth: usize },
    /// A candidate rule was abandoned because one of its conditions failed
    CandidateRejected {
        goal: &'a Goal,
        rule: &'a str,
        condition: &'a Goal,
        depth: usize,
    },
    GoalProved {
        goal: &'a Goal,
        rule: &'a str,
        depth: usize,
    },
    /// Every candidate for the goal failed
    CandidatesExhausted {
        goal: &'a Goal,
        candidates: &'a [String],
        depth: usize,
    },
    /// Grouped resolution applied one group
    GroupApplied {
        index: usize,
        group: &'a [String],
        fired: &'a [String],
        facts: &'a FactBase,
    },
}

pub trait Tracer {
    fn on_event(&mut self, event: &TraceEvent<'_>);
}

/// Tracer that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl Tracer for NoTrace {
    fn on_event(&mut self, _event: &TraceEvent<'_>) {}
}

impl<F> Tracer for F
where
    F: FnMut(&TraceEvent<'_>),
{
    fn on_event(&mut self, event: &TraceEvent<'_>) {
        self(event)
    }
}
