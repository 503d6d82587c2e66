//! Forward chaining
//!
//! Each round computes the eligible rules, orders them, and fires either all
//! of them (breadth) or only the first one (depth). A fired rule leaves the
//! pool, so no rule fires twice in a run.

use crate::strategy::eligible_rules;
use crate::trace::{TraceEvent, Tracer};
use crate::{
    EngineResult, FactBase, FiringStrategy, ForwardOutcome, Goal, OrderingStrategy, RuleSet,
    Termination,
};
use tracing::debug;

/// Run forward chaining to saturation, or until `goal` holds
///
/// The run takes ownership of `rules` and `facts` and hands them back in the
/// outcome. A conclusion contradicting a held fact aborts the run with
/// [`crate::EngineError::FactConflict`].
pub fn forward_chain(
    mut rules: RuleSet,
    mut facts: FactBase,
    firing: FiringStrategy,
    ordering: OrderingStrategy,
    goal: Option<&Goal>,
    tracer: &mut dyn Tracer,
) -> EngineResult<ForwardOutcome> {
    let goal_met = |facts: &FactBase| goal.is_some_and(|goal| facts.satisfies(goal));

    let mut fired = Vec::new();
    let mut round = 0;
    let mut eligible = eligible_rules(&rules, &facts);

    while !rules.is_empty() && !eligible.is_empty() && !goal_met(&facts) {
        round += 1;
        tracer.on_event(&TraceEvent::RoundStarted {
            round,
            eligible: &eligible,
            facts: &facts,
            remaining: &rules,
        });
        debug!(round, eligible = eligible.len(), strategy = %firing, "forward round");

        ordering.order(&mut eligible, &rules, &facts);
        let batch = match firing {
            FiringStrategy::Breadth => &eligible[..],
            FiringStrategy::Depth => &eligible[..1],
        };

        for id in batch {
            let Some(rule) = rules.remove(id) else {
                continue;
            };
            facts.assert_all(&rule.conclusion)?;
            debug!(round, rule = %rule.id, "rule fired");
            tracer.on_event(&TraceEvent::RuleFired {
                round,
                rule: &rule.id,
                conclusion: &rule.conclusion,
            });
            fired.push(rule.id);
        }

        eligible = eligible_rules(&rules, &facts);
    }

    let (termination, goal_reached) = match goal {
        Some(_) if goal_met(&facts) => (Termination::GoalReached, Some(true)),
        Some(_) => (Termination::NoProgress, Some(false)),
        None => (Termination::Saturated, None),
    };
    debug!(rounds = round, fired = fired.len(), ?termination, "forward chaining done");

    Ok(ForwardOutcome {
        facts,
        remaining: rules,
        fired,
        rounds: round,
        termination,
        goal_reached,
    })
}
