//! JSON knowledge-base loader
//!
//! ```text
//! {
//!   "facts": { "feathers": "yes" },
//!   "rules": [
//!     { "id": "R1", "conditions": { "feathers": "yes" }, "conclusion": { "class": "bird" } }
//!   ]
//! }
//! ```
//!
//! The French keys `"faits"` and `"règles"` are accepted as well. Values may be
//! strings, numbers or booleans and are kept as their textual form.

use crate::{Assignments, EngineError, EngineResult, FactBase, KnowledgeBase, Rule, RuleSet};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Deserialize)]
struct RawKnowledgeBase {
    #[serde(default, alias = "faits")]
    facts: IndexMap<String, Value>,
    #[serde(alias = "règles", alias = "regles")]
    rules: Vec<RawRule>,
}

#[derive(Deserialize)]
struct RawRule {
    id: Value,
    conditions: IndexMap<String, Value>,
    conclusion: IndexMap<String, Value>,
}

/// Decode a knowledge base, keeping the source order of facts and rules
pub fn load_json(text: &str, source_id: &str) -> EngineResult<KnowledgeBase> {
    let raw: RawKnowledgeBase = serde_json::from_str(text).map_err(|err| EngineError::Load {
        source_id: source_id.to_string(),
        message: err.to_string(),
        location: (err.line() > 0).then(|| (err.line(), err.column())),
    })?;

    let mut facts = FactBase::new();
    for (attribute, value) in raw.facts {
        let value = scalar(source_id, &format!("fact '{}'", attribute), value)?;
        facts.insert(attribute, value)?;
    }

    let mut rules = RuleSet::new();
    for raw_rule in raw.rules {
        let id = scalar(source_id, "rule id", raw_rule.id)?;
        let conditions = assignments(source_id, &id, "conditions", raw_rule.conditions)?;
        let conclusion = assignments(source_id, &id, "conclusion", raw_rule.conclusion)?;
        rules.insert(Rule {
            id,
            conditions,
            conclusion,
        })?;
    }

    debug!(
        source = source_id,
        facts = facts.len(),
        rules = rules.len(),
        "knowledge base loaded"
    );
    Ok(KnowledgeBase::new(rules, facts))
}

fn assignments(
    source_id: &str,
    rule_id: &str,
    side: &str,
    raw: IndexMap<String, Value>,
) -> EngineResult<Assignments> {
    raw.into_iter()
        .map(|(attribute, value)| {
            let context = format!("{} of rule '{}', attribute '{}'", side, rule_id, attribute);
            scalar(source_id, &context, value).map(|value| (attribute, value))
        })
        .collect()
}

fn scalar(source_id: &str, context: &str, value: Value) -> EngineResult<String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(EngineError::load(
            source_id,
            format!("{} must be a string, number or boolean, found {}", context, other),
        )),
    }
}
