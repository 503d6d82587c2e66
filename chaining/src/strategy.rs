//! Rule eligibility and conflict resolution
//!
//! Strategy names are parsed once into closed enums; every engine then goes
//! through [`OrderingStrategy::sort_with`] to order its candidates.

use crate::{EngineError, FactBase, Rule, RuleSet};
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Ids of the rules whose conditions all hold, in pool order
pub fn eligible_rules(rules: &RuleSet, facts: &FactBase) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| facts.matches(&rule.conditions))
        .map(|rule| rule.id.clone())
        .collect()
}

/// Conflict-resolution ordering applied to candidate rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum OrderingStrategy {
    /// Keep pool order
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "premise-count-asc")]
    PremiseCountAscending,
    #[serde(rename = "premise-count-desc")]
    PremiseCountDescending,
    /// Rules whose premises were asserted most recently come first
    #[serde(rename = "most-recent-premise")]
    MostRecentPremiseFirst,
    #[serde(rename = "oldest-premise")]
    OldestPremiseFirst,
}

impl OrderingStrategy {
    pub const ALL: [OrderingStrategy; 5] = [
        OrderingStrategy::None,
        OrderingStrategy::PremiseCountAscending,
        OrderingStrategy::PremiseCountDescending,
        OrderingStrategy::MostRecentPremiseFirst,
        OrderingStrategy::OldestPremiseFirst,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OrderingStrategy::None => "none",
            OrderingStrategy::PremiseCountAscending => "premise-count-asc",
            OrderingStrategy::PremiseCountDescending => "premise-count-desc",
            OrderingStrategy::MostRecentPremiseFirst => "most-recent-premise",
            OrderingStrategy::OldestPremiseFirst => "oldest-premise",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OrderingStrategy::None => "None (knowledge base order)",
            OrderingStrategy::PremiseCountAscending => "Fewest premises first",
            OrderingStrategy::PremiseCountDescending => "Most premises first",
            OrderingStrategy::MostRecentPremiseFirst => "Most recent premises first",
            OrderingStrategy::OldestPremiseFirst => "Oldest premises first",
        }
    }

    /// Stable sort of `items`, each resolved to its rule through `rule_of`
    ///
    /// Items whose rule cannot be resolved sort as a rule without premises.
    pub fn sort_with<'r, T>(
        self,
        items: &mut [T],
        rule_of: impl Fn(&T) -> Option<&'r Rule>,
        facts: &FactBase,
    ) {
        let premise_count = |item: &T| rule_of(item).map_or(0, |rule| rule.conditions.len());
        let recency = |item: &T| {
            rule_of(item)
                .map(|rule| recency_key(rule, facts))
                .unwrap_or_default()
        };

        match self {
            OrderingStrategy::None => {}
            OrderingStrategy::PremiseCountAscending => items.sort_by_key(premise_count),
            OrderingStrategy::PremiseCountDescending => {
                items.sort_by_key(|item| Reverse(premise_count(item)))
            }
            OrderingStrategy::MostRecentPremiseFirst => {
                items.sort_by_key(|item| Reverse(recency(item)))
            }
            OrderingStrategy::OldestPremiseFirst => items.sort_by_key(recency),
        }
    }

    /// Order rule ids drawn from `rules`
    pub fn order(self, ids: &mut [String], rules: &RuleSet, facts: &FactBase) {
        self.sort_with(ids, |id| rules.get(id), facts);
    }
}

/// Fact positions of a rule's premises, most recent first
///
/// Compared lexicographically, a larger key means more recent premises.
/// Premises not currently held contribute nothing.
pub fn recency_key(rule: &Rule, facts: &FactBase) -> Vec<usize> {
    let mut positions: Vec<usize> = rule
        .conditions
        .iter()
        .filter_map(|(attribute, value)| facts.position_of(attribute, value))
        .collect();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OrderingStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "aucun" => Ok(OrderingStrategy::None),
            "premise-count-asc" | "nbpremisses_croiss" => {
                Ok(OrderingStrategy::PremiseCountAscending)
            }
            "premise-count-desc" | "nbpremisses_decroiss" => {
                Ok(OrderingStrategy::PremiseCountDescending)
            }
            "most-recent-premise" | "premisse_rec" => Ok(OrderingStrategy::MostRecentPremiseFirst),
            "oldest-premise" | "premisse_anc" => Ok(OrderingStrategy::OldestPremiseFirst),
            other => Err(EngineError::unknown_criterion(
                "ordering criterion",
                other,
                &OrderingStrategy::ALL.map(OrderingStrategy::name),
            )),
        }
    }
}

/// How many eligible rules fire per forward-chaining round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FiringStrategy {
    /// Every eligible rule fires each round
    #[default]
    Breadth,
    /// Only the first eligible rule fires, then eligibility is recomputed
    Depth,
}

impl FiringStrategy {
    pub const ALL: [FiringStrategy; 2] = [FiringStrategy::Breadth, FiringStrategy::Depth];

    pub fn name(self) -> &'static str {
        match self {
            FiringStrategy::Breadth => "breadth",
            FiringStrategy::Depth => "depth",
        }
    }
}

impl fmt::Display for FiringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FiringStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "breadth" | "largeur" => Ok(FiringStrategy::Breadth),
            "depth" | "profondeur" => Ok(FiringStrategy::Depth),
            other => Err(EngineError::unknown_criterion(
                "firing strategy",
                other,
                &FiringStrategy::ALL.map(FiringStrategy::name),
            )),
        }
    }
}
