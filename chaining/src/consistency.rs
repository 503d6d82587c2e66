//! Consistency checks
//!
//! Two independent checks:
//!
//! - **Rule level**: attributes that no rule concludes are *askable* (they
//!   must come from outside). For every concluded pair we collect the
//!   askable assignments that are sufficient to derive it, then look for an
//!   attribute whose different values can be reached from overlapping inputs.
//!   The result is advisory.
//! - **Fact level**: a depth-first forward chain on private copies, stopping
//!   at the first conclusion that contradicts a held fact. This one is fatal
//!   for any run built on the same facts.

use crate::strategy::eligible_rules;
use crate::{EngineError, FactBase, OrderingStrategy, Rule, RuleSet};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Askable attribute -> value: one set of inputs sufficient for a conclusion
pub type Derivation = BTreeMap<String, String>;

/// Which derivation pairs count as incoherent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// One derivation's inputs contain the other's
    #[default]
    Subsumption,
    /// Any two derivations that can hold at the same time, including disjoint ones
    Compatible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    Subsumption,
    Compatible,
}

/// Two derivations reaching different values of one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleConflict {
    pub attribute: String,
    pub left_value: String,
    pub left: Derivation,
    pub right_value: String,
    pub right: Derivation,
    pub kind: ConflictKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleIncoherenceReport {
    /// Attributes required by some rule and concluded by none, in pool order
    pub askable: Vec<String>,
    pub conflicts: Vec<RuleConflict>,
    /// Rules the exploration never reached (cycles, or starved by them)
    pub unexplored: Vec<String>,
}

impl RuleIncoherenceReport {
    pub fn is_coherent(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Look for attributes whose different values follow from overlapping inputs
pub fn find_rule_incoherence(rules: &RuleSet, strictness: Strictness) -> RuleIncoherenceReport {
    let concluded: IndexSet<&str> = rules
        .iter()
        .flat_map(|rule| rule.conclusion.keys().map(String::as_str))
        .collect();
    let askable: IndexSet<&str> = rules
        .iter()
        .flat_map(|rule| rule.conditions.keys().map(String::as_str))
        .filter(|attribute| !concluded.contains(attribute))
        .collect();

    // askable attributes plus concluded ones whose every producer was explored
    let mut settled: HashSet<&str> = askable.iter().copied().collect();
    let mut derivations: IndexMap<(&str, &str), Vec<Derivation>> = IndexMap::new();
    let mut explored = vec![false; rules.len()];
    let mut queued = vec![false; rules.len()];
    let mut queue = VecDeque::new();

    for (index, rule) in rules.iter().enumerate() {
        if ready(rule, &settled) {
            queued[index] = true;
            queue.push_back(index);
        }
    }

    while let Some(index) = queue.pop_front() {
        let Some(rule) = rules.get_index(index) else {
            continue;
        };

        let derived = derive(rule, &askable, &derivations);
        for (attribute, value) in &rule.conclusion {
            let list = derivations
                .entry((attribute.as_str(), value.as_str()))
                .or_default();
            for derivation in &derived {
                if !list.contains(derivation) {
                    list.push(derivation.clone());
                }
            }
        }
        explored[index] = true;

        for attribute in &concluded {
            if settled.contains(attribute) {
                continue;
            }
            let saturated = rules
                .iter()
                .enumerate()
                .filter(|(_, producer)| producer.conclusion.contains_key(*attribute))
                .all(|(producer, _)| explored[producer]);
            if saturated {
                settled.insert(*attribute);
            }
        }

        for (candidate, rule) in rules.iter().enumerate() {
            if !queued[candidate] && ready(rule, &settled) {
                queued[candidate] = true;
                queue.push_back(candidate);
            }
        }
    }

    let conflicts = find_conflicts(&derivations, strictness);
    let unexplored: Vec<String> = rules
        .iter()
        .zip(&explored)
        .filter(|(_, done)| !**done)
        .map(|(rule, _)| rule.id.clone())
        .collect();

    if !conflicts.is_empty() {
        warn!(conflicts = conflicts.len(), "rule base is incoherent");
    }
    if !unexplored.is_empty() {
        debug!(?unexplored, "rules unreachable from askable attributes");
    }

    RuleIncoherenceReport {
        askable: askable.iter().map(|a| a.to_string()).collect(),
        conflicts,
        unexplored,
    }
}

/// Every condition attribute is askable or already settled
fn ready(rule: &Rule, settled: &HashSet<&str>) -> bool {
    rule.conditions
        .keys()
        .all(|attribute| settled.contains(attribute.as_str()))
}

/// Cross product of the options for every condition of `rule`
///
/// Askable conditions contribute their literal pair; concluded ones the
/// derivations collected so far. Combinations giving one askable attribute
/// two values are impossible and dropped.
fn derive<'r>(
    rule: &'r Rule,
    askable: &IndexSet<&'r str>,
    derivations: &IndexMap<(&'r str, &'r str), Vec<Derivation>>,
) -> Vec<Derivation> {
    let mut partials = vec![Derivation::new()];

    for (attribute, value) in &rule.conditions {
        let options: Vec<Derivation> = if askable.contains(attribute.as_str()) {
            vec![Derivation::from([(attribute.clone(), value.clone())])]
        } else {
            derivations
                .get(&(attribute.as_str(), value.as_str()))
                .cloned()
                .unwrap_or_default()
        };

        let mut next = Vec::new();
        for partial in &partials {
            for option in &options {
                if !compatible(partial, option) {
                    continue;
                }
                let mut merged = partial.clone();
                merged.extend(option.iter().map(|(a, v)| (a.clone(), v.clone())));
                if !next.contains(&merged) {
                    next.push(merged);
                }
            }
        }
        partials = next;
    }

    partials
}

fn find_conflicts(
    derivations: &IndexMap<(&str, &str), Vec<Derivation>>,
    strictness: Strictness,
) -> Vec<RuleConflict> {
    let mut by_attribute: IndexMap<&str, Vec<(&str, &Vec<Derivation>)>> = IndexMap::new();
    for ((attribute, value), list) in derivations {
        if !list.is_empty() {
            by_attribute
                .entry(*attribute)
                .or_default()
                .push((*value, list));
        }
    }

    let mut conflicts = Vec::new();
    for (attribute, values) in &by_attribute {
        for (i, (left_value, left_list)) in values.iter().enumerate() {
            for (right_value, right_list) in &values[i + 1..] {
                for left in left_list.iter() {
                    for right in right_list.iter() {
                        let kind = if is_subset(left, right) || is_subset(right, left) {
                            ConflictKind::Subsumption
                        } else if strictness == Strictness::Compatible && compatible(left, right) {
                            ConflictKind::Compatible
                        } else {
                            continue;
                        };
                        conflicts.push(RuleConflict {
                            attribute: attribute.to_string(),
                            left_value: left_value.to_string(),
                            left: left.clone(),
                            right_value: right_value.to_string(),
                            right: right.clone(),
                            kind,
                        });
                    }
                }
            }
        }
    }
    conflicts
}

fn is_subset(small: &Derivation, large: &Derivation) -> bool {
    small
        .iter()
        .all(|(attribute, value)| large.get(attribute) == Some(value))
}

/// No attribute is assigned two different values
fn compatible(a: &Derivation, b: &Derivation) -> bool {
    a.iter()
        .all(|(attribute, value)| b.get(attribute).map_or(true, |other| other == value))
}

/// A conclusion that contradicts a held fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactIncoherence {
    pub rule: String,
    pub attribute: String,
    pub existing: String,
    pub attempted: String,
    /// Rules fired by the simulation before the clash
    pub fired_before: Vec<String>,
}

impl From<FactIncoherence> for EngineError {
    fn from(found: FactIncoherence) -> Self {
        EngineError::FactIncoherence {
            rule: found.rule,
            attribute: found.attribute,
            existing: found.existing,
            attempted: found.attempted,
        }
    }
}

/// Simulate depth-first forward chaining and report the first contradiction
///
/// Works on copies; `rules` and `facts` are left untouched.
pub fn find_fact_incoherence(
    rules: &RuleSet,
    facts: &FactBase,
    ordering: OrderingStrategy,
) -> Option<FactIncoherence> {
    let mut pool = rules.clone();
    let mut facts = facts.clone();
    let mut fired = Vec::new();

    loop {
        let mut eligible = eligible_rules(&pool, &facts);
        ordering.order(&mut eligible, &pool, &facts);
        let Some(rule) = eligible.first().and_then(|id| pool.remove(id)) else {
            break;
        };

        if let Some((attribute, attempted, existing)) = facts.first_clash(&rule.conclusion) {
            warn!(rule = %rule.id, attribute, existing, attempted, "fact incoherence");
            return Some(FactIncoherence {
                rule: rule.id.clone(),
                attribute: attribute.to_string(),
                existing: existing.to_string(),
                attempted: attempted.to_string(),
                fired_before: fired,
            });
        }
        facts.commit(&rule.conclusion);
        fired.push(rule.id);
    }

    debug!(fired = fired.len(), "facts consistent with rules");
    None
}

/// True when no rule, fired depth-first, contradicts the facts
pub fn check_fact_consistency(rules: &RuleSet, facts: &FactBase) -> bool {
    find_fact_incoherence(rules, facts, OrderingStrategy::None).is_none()
}
