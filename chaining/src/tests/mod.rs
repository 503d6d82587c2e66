use crate::{FactBase, Rule, RuleSet};



mod engine;
mod grouping;

fn rule_set(rules: Vec<Rule>) -> RuleSet {
    RuleSet::from_rules(rules).unwrap()
}

fn fact_base(pairs: &[(&str, &str)]) -> FactBase {
    let mut facts = FactBase::new();
    for (attribute, value) in pairs {
        facts.insert(*attribute, *value).unwrap();
    }
    facts
}

/// R1: true => a=1, R2: a=1 => b=2
fn two_step_rules() -> RuleSet {
    rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").when("a", "1").then("b", "2"),
    ])
}
