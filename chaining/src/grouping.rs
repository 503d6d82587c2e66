//! Dependency-ordered rule groups
//!
//! Rule S depends on rule R when R concludes a pair that S requires. Groups
//! are peeled layer by layer: a rule joins the next group once every rule it
//! depends on sits in an earlier group, or straight away when the initial
//! facts already satisfy its conditions.

use crate::trace::{TraceEvent, Tracer};
use crate::{EngineError, EngineResult, FactBase, Goal, GroupedOutcome, RuleSet};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Predecessor sets: rule id -> ids of the other rules that supply one of its conditions
///
/// Every rule of the pool has an entry, possibly empty, in pool order.
pub fn predecessors(rules: &RuleSet) -> IndexMap<String, IndexSet<String>> {
    let mut graph: IndexMap<String, IndexSet<String>> = rules
        .ids()
        .map(|id| (id.to_string(), IndexSet::new()))
        .collect();

    for supplier in rules.iter() {
        for (attribute, value) in &supplier.conclusion {
            for consumer in rules.iter() {
                if consumer.id != supplier.id && consumer.requires(attribute, value) {
                    if let Some(preds) = graph.get_mut(&consumer.id) {
                        preds.insert(supplier.id.clone());
                    }
                }
            }
        }
    }

    graph
}

/// Layer the pool into firing groups
///
/// Fails with [`EngineError::CycleOrDeadlock`] when some rules can never be
/// placed: they depend on each other and the initial facts do not release
/// any of them.
pub fn rule_groups(rules: &RuleSet, initial: &FactBase) -> EngineResult<Vec<Vec<String>>> {
    let mut pending = predecessors(rules);
    let mut groups = Vec::new();

    while !pending.is_empty() {
        let group: Vec<String> = pending
            .iter()
            .filter(|(id, preds)| {
                preds.is_empty()
                    || rules
                        .get(id)
                        .is_some_and(|rule| initial.matches(&rule.conditions))
            })
            .map(|(id, _)| id.clone())
            .collect();

        if group.is_empty() {
            let stuck: Vec<String> = pending.keys().cloned().collect();
            debug!(pending = stuck.len(), "grouping cannot progress");
            return Err(EngineError::CycleOrDeadlock { pending: stuck });
        }

        for id in &group {
            pending.shift_remove(id);
        }
        for preds in pending.values_mut() {
            preds.retain(|pred| !group.contains(pred));
        }

        debug!(group = groups.len(), size = group.len(), "rule group formed");
        groups.push(group);
    }

    Ok(groups)
}

/// Fire the rule groups in order until the goal holds or every group ran
///
/// Inside a group rules are tried in pool order, each against the facts as
/// left by the rules fired before it. `rules` is left untouched.
pub fn resolve_by_groups(
    rules: &RuleSet,
    mut facts: FactBase,
    goal: Option<&Goal>,
    tracer: &mut dyn Tracer,
) -> EngineResult<GroupedOutcome> {
    let groups = rule_groups(rules, &facts)?;
    let goal_met = |facts: &FactBase| goal.is_some_and(|goal| facts.satisfies(goal));

    let mut fired = Vec::new();
    let mut applied_groups = 0;

    if !goal_met(&facts) {
        for (index, group) in groups.iter().enumerate() {
            let mut group_fired = Vec::new();
            for id in group {
                let Some(rule) = rules.get(id) else {
                    continue;
                };
                if facts.matches(&rule.conditions) {
                    facts.assert_all(&rule.conclusion)?;
                    group_fired.push(rule.id.clone());
                }
            }

            applied_groups = index + 1;
            debug!(group = index, fired = group_fired.len(), "rule group applied");
            tracer.on_event(&TraceEvent::GroupApplied {
                index,
                group,
                fired: &group_fired,
                facts: &facts,
            });
            fired.extend(group_fired);

            if goal_met(&facts) {
                break;
            }
        }
    }

    let goal_reached = goal.map(|_| goal_met(&facts));
    Ok(GroupedOutcome {
        facts,
        groups,
        applied_groups,
        fired,
        goal_reached,
    })
}
