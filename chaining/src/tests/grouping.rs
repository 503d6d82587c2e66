use super::{fact_base, rule_set, two_step_rules};
use crate::{
    forward_chain, predecessors, resolve_by_groups, rule_groups, EngineError, FactBase,
    FiringStrategy, Goal, NoTrace, OrderingStrategy, Rule, RuleSet, TraceEvent,
};

fn cyclic_rules() -> RuleSet {
    rule_set(vec![
        Rule::new("R1").when("b", "1").then("a", "1"),
        Rule::new("R2").when("a", "1").then("b", "1"),
    ])
}

#[test]
fn test_predecessors() {
    let rules = rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").then("b", "1"),
        Rule::new("R3").when("a", "1").when("b", "1").then("c", "1"),
        Rule::new("R4").when("a", "2").then("d", "1"),
    ]);

    let graph = predecessors(&rules);

    assert_eq!(graph.keys().collect::<Vec<_>>(), vec!["R1", "R2", "R3", "R4"]);
    assert!(graph["R1"].is_empty());
    assert_eq!(graph["R3"].iter().collect::<Vec<_>>(), vec!["R1", "R2"]);
    // value must match, not only the attribute
    assert!(graph["R4"].is_empty());
}

#[test]
fn test_self_dependency_is_ignored() {
    let rules = rule_set(vec![Rule::new("R1").when("a", "1").then("a", "1")]);
    assert!(predecessors(&rules)["R1"].is_empty());
}

#[test]
fn test_groups_follow_dependencies() {
    let groups = rule_groups(&two_step_rules(), &FactBase::new()).unwrap();
    assert_eq!(groups, vec![vec!["R1"], vec!["R2"]]);
}

#[test]
fn test_contradicting_pool_still_groups() {
    let rules = rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").when("a", "1").then("a", "2"),
    ]);
    let groups = rule_groups(&rules, &FactBase::new()).unwrap();
    assert_eq!(groups, vec![vec!["R1"], vec!["R2"]]);
}

#[test]
fn test_cycle_is_fatal() {
    let err = rule_groups(&cyclic_rules(), &FactBase::new()).unwrap_err();
    assert_eq!(
        err,
        EngineError::CycleOrDeadlock {
            pending: vec!["R1".to_string(), "R2".to_string()],
        }
    );
}

#[test]
fn test_initial_facts_release_a_cycle() {
    let groups = rule_groups(&cyclic_rules(), &fact_base(&[("a", "1")])).unwrap();
    assert_eq!(groups, vec![vec!["R2"], vec!["R1"]]);
}

#[test]
fn test_every_rule_in_exactly_one_group() {
    let rules = rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").when("a", "1").then("b", "1"),
        Rule::new("R3").when("a", "1").then("c", "1"),
        Rule::new("R4").when("b", "1").when("c", "1").then("d", "1"),
        Rule::new("R5").when("x", "1").then("e", "1"),
    ]);

    let groups = rule_groups(&rules, &FactBase::new()).unwrap();

    assert_eq!(
        groups,
        vec![vec!["R1", "R5"], vec!["R2", "R3"], vec!["R4"]]
    );
    let mut placed: Vec<&String> = groups.iter().flatten().collect();
    placed.sort();
    assert_eq!(placed, vec!["R1", "R2", "R3", "R4", "R5"]);
}

#[test]
fn test_resolve_applies_every_group() {
    let outcome = resolve_by_groups(&two_step_rules(), FactBase::new(), None, &mut NoTrace).unwrap();

    assert_eq!(outcome.facts, fact_base(&[("a", "1"), ("b", "2")]));
    assert_eq!(outcome.applied_groups, 2);
    assert_eq!(outcome.fired, vec!["R1", "R2"]);
    assert_eq!(outcome.goal_reached, None);
}

#[test]
fn test_resolve_stops_at_goal() {
    let goal = Goal::new("a", "1");

    let outcome =
        resolve_by_groups(&two_step_rules(), FactBase::new(), Some(&goal), &mut NoTrace).unwrap();

    assert_eq!(outcome.applied_groups, 1);
    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.fired, vec!["R1"]);
    assert_eq!(outcome.goal_reached, Some(true));
}

#[test]
fn test_resolve_goal_initially_held() {
    let goal = Goal::new("a", "1");

    let outcome = resolve_by_groups(
        &two_step_rules(),
        fact_base(&[("a", "1")]),
        Some(&goal),
        &mut NoTrace,
    )
    .unwrap();

    assert_eq!(outcome.applied_groups, 0);
    assert!(outcome.fired.is_empty());
    assert_eq!(outcome.goal_reached, Some(true));
}

#[test]
fn test_resolve_reports_unreached_goal() {
    let goal = Goal::new("b", "3");

    let outcome =
        resolve_by_groups(&two_step_rules(), FactBase::new(), Some(&goal), &mut NoTrace).unwrap();

    assert_eq!(outcome.applied_groups, 2);
    assert_eq!(outcome.goal_reached, Some(false));
}

#[test]
fn test_unsatisfied_rule_in_group_does_not_fire() {
    let rules = rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").when("x", "1").then("b", "1"),
    ]);
    let mut applied = Vec::new();

    let outcome = {
        let mut tracer = |event: &TraceEvent<'_>| {
            if let TraceEvent::GroupApplied { group, fired, .. } = event {
                applied.push((group.to_vec(), fired.to_vec()));
            }
        };
        resolve_by_groups(&rules, FactBase::new(), None, &mut tracer).unwrap()
    };

    assert_eq!(outcome.fired, vec!["R1"]);
    assert_eq!(
        applied,
        vec![(
            vec!["R1".to_string(), "R2".to_string()],
            vec!["R1".to_string()]
        )]
    );
}

#[test]
fn test_resolve_propagates_conflict() {
    let rules = rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").when("a", "1").then("a", "2"),
    ]);

    let err = resolve_by_groups(&rules, FactBase::new(), None, &mut NoTrace).unwrap_err();

    assert!(matches!(err, EngineError::FactConflict { ref attribute, .. } if attribute == "a"));
}

fn saturate(rules: &RuleSet, facts: FactBase) -> Result<FactBase, EngineError> {
    forward_chain(
        rules.clone(),
        facts,
        FiringStrategy::Breadth,
        OrderingStrategy::None,
        None,
        &mut NoTrace,
    )
    .map(|outcome| outcome.facts)
}

#[test]
fn test_shared_supplier_matches_breadth() {
    let rules = rule_set(vec![
        Rule::new("R1").when("x", "1").then("d", "1"),
        Rule::new("R2").then("d", "1"),
        Rule::new("R3").when("d", "1").then("e", "1"),
        Rule::new("R4").when("d", "0").then("f", "1"),
    ]);
    let facts = fact_base(&[("x", "1")]);

    let outcome = resolve_by_groups(&rules, facts.clone(), None, &mut NoTrace).unwrap();

    assert_eq!(
        outcome.groups,
        vec![
            vec!["R1".to_string(), "R2".to_string(), "R4".to_string()],
            vec!["R3".to_string()],
        ]
    );
    assert_eq!(outcome.facts, saturate(&rules, facts).unwrap());
    assert_eq!(outcome.facts.get("e"), Some("1"));
    assert_eq!(outcome.facts.get("f"), None);
}

#[test]
fn test_rival_values_conflict_on_both_paths() {
    let rules = rule_set(vec![
        Rule::new("R1").then("d", "1"),
        Rule::new("R2").when("x", "1").then("d", "0"),
    ]);
    let facts = fact_base(&[("x", "1")]);

    let grouped = resolve_by_groups(&rules, facts.clone(), None, &mut NoTrace).unwrap_err();
    let breadth = saturate(&rules, facts).unwrap_err();

    assert!(matches!(grouped, EngineError::FactConflict { ref attribute, .. } if attribute == "d"));
    assert!(matches!(breadth, EngineError::FactConflict { ref attribute, .. } if attribute == "d"));
}
