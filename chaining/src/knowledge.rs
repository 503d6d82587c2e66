//! Knowledge base data model
//!
//! Facts are attribute=value pairs held in insertion order. Rules map a
//! conjunction of required pairs to a conjunction of asserted pairs.

use crate::{EngineError, EngineResult};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Attribute -> value pairs, used for rule conditions, conclusions and derivations
pub type Assignments = IndexMap<String, String>;

/// An (attribute, value) target for chaining
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Goal {
    pub attribute: String,
    pub value: String,
}

impl Goal {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attribute, self.value)
    }
}

/// The fact mapping of a run
///
/// Holds at most one value per attribute. Insertion order is kept because
/// recency-based ordering strategies compare fact positions. Equality ignores
/// order: two fact bases are equal when they hold the same pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FactBase {
    facts: IndexMap<String, String>,
}

impl FactBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fact, failing if the attribute already holds another value
    ///
    /// Re-inserting an identical pair is a no-op and keeps its position.
    pub fn insert(
        &mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> EngineResult<()> {
        let attribute = attribute.into();
        let value = value.into();
        match self.facts.get(&attribute) {
            Some(existing) if *existing == value => Ok(()),
            Some(existing) => Err(EngineError::FactConflict {
                attribute,
                existing: existing.clone(),
                attempted: value,
            }),
            None => {
                self.facts.insert(attribute, value);
                Ok(())
            }
        }
    }

    /// Insert every pair of `assignments`, stopping at the first conflict
    pub fn assert_all(&mut self, assignments: &Assignments) -> EngineResult<()> {
        for (attribute, value) in assignments {
            self.insert(attribute.as_str(), value.as_str())?;
        }
        Ok(())
    }

    /// Insert pairs already checked with [`FactBase::first_clash`]
    pub(crate) fn commit(&mut self, assignments: &Assignments) {
        for (attribute, value) in assignments {
            self.facts
                .entry(attribute.clone())
                .or_insert_with(|| value.clone());
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.facts.get(attribute).map(String::as_str)
    }

    /// Insertion index of the exact pair, `None` if absent or holding another value
    pub fn position_of(&self, attribute: &str, value: &str) -> Option<usize> {
        self.facts
            .get_full(attribute)
            .filter(|(_, _, held)| held.as_str() == value)
            .map(|(index, _, _)| index)
    }

    pub fn holds(&self, attribute: &str, value: &str) -> bool {
        self.get(attribute) == Some(value)
    }

    pub fn satisfies(&self, goal: &Goal) -> bool {
        self.holds(&goal.attribute, &goal.value)
    }

    /// True when every required pair is present with the same value
    pub fn matches(&self, conditions: &Assignments) -> bool {
        conditions
            .iter()
            .all(|(attribute, value)| self.holds(attribute, value))
    }

    /// First pair of `assignments` that contradicts a held fact
    pub fn first_clash<'a>(
        &self,
        assignments: &'a Assignments,
    ) -> Option<(&'a str, &'a str, &str)> {
        assignments
            .iter()
            .find_map(|(attribute, value)| match self.get(attribute) {
                Some(existing) if existing != value.as_str() => {
                    Some((attribute.as_str(), value.as_str(), existing))
                }
                _ => None,
            })
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facts.iter().map(|(a, v)| (a.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a FactBase {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

impl fmt::Display for FactBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (attribute, value)) in self.facts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", attribute, value)?;
        }
        write!(f, "}}")
    }
}

/// A production rule: all conditions hold => every conclusion is asserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub id: String,
    pub conditions: Assignments,
    pub conclusion: Assignments,
}

impl Rule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            conditions: Assignments::new(),
            conclusion: Assignments::new(),
        }
    }

    /// Add a required pair
    pub fn when(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.insert(attribute.into(), value.into());
        self
    }

    /// Add an asserted pair
    pub fn then(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.conclusion.insert(attribute.into(), value.into());
        self
    }

    pub fn concludes(&self, goal: &Goal) -> bool {
        self.conclusion.get(&goal.attribute) == Some(&goal.value)
    }

    pub fn requires(&self, attribute: &str, value: &str) -> bool {
        self.conditions.get(attribute).map(String::as_str) == Some(value)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |pairs: &Assignments| {
            pairs
                .iter()
                .map(|(a, v)| format!("{}={}", a, v))
                .collect::<Vec<_>>()
                .join(" & ")
        };
        let conditions = if self.conditions.is_empty() {
            "true".to_string()
        } else {
            side(&self.conditions)
        };
        write!(f, "{}: {} => {}", self.id, conditions, side(&self.conclusion))
    }
}

/// Rules keyed by id, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: IndexMap<String, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> EngineResult<Self> {
        let mut set = Self::new();
        for rule in rules {
            set.insert(rule)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, rule: Rule) -> EngineResult<()> {
        if self.rules.contains_key(&rule.id) {
            return Err(EngineError::DuplicateRule(rule.id));
        }
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// Remove a rule, keeping the relative order of the others
    pub fn remove(&mut self, id: &str) -> Option<Rule> {
        self.rules.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Rule> {
        self.rules.get_index(index).map(|(_, rule)| rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

/// Rules and facts as produced by a loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeBase {
    pub rules: RuleSet,
    pub facts: FactBase,
}

impl KnowledgeBase {
    pub fn new(rules: RuleSet, facts: FactBase) -> Self {
        Self { rules, facts }
    }
}
