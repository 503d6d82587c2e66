use super::{rule_set, two_step_rules};
use crate::{
    Engine, EngineConfig, EngineError, FactBase, FiringStrategy, Goal, KnowledgeBase,
    OrderingStrategy, Rule, Strictness, Termination, TraceEvent,
};

fn contradicting_engine(config: EngineConfig) -> Engine {
    let rules = rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").when("a", "1").then("a", "2"),
    ]);
    let mut facts = FactBase::new();
    facts.insert("a", "1").unwrap();
    Engine::with_config(KnowledgeBase::new(rules, facts), config)
}

#[test]
fn test_runs_do_not_touch_the_knowledge_base() {
    let engine = Engine::new(KnowledgeBase::new(two_step_rules(), FactBase::new()));

    let first = engine.forward(None).unwrap();
    let second = engine.forward(None).unwrap();

    assert_eq!(first.facts, second.facts);
    assert!(engine.facts().is_empty());
    assert_eq!(engine.rules().len(), 2);
}

#[test]
fn test_all_engines_agree_on_two_step_example() {
    let engine = Engine::new(KnowledgeBase::new(two_step_rules(), FactBase::new()));
    let goal = Goal::new("b", "2");

    let forward = engine.forward(Some(&goal)).unwrap();
    let (provable, proof) = engine.backward(&goal).unwrap();
    let grouped = engine.grouped(Some(&goal)).unwrap();

    assert_eq!(forward.termination, Termination::GoalReached);
    assert!(provable);
    assert_eq!(proof.rules_used(), vec!["R2", "R1"]);
    assert_eq!(grouped.goal_reached, Some(true));
    assert_eq!(engine.groups().unwrap(), vec![vec!["R1"], vec!["R2"]]);
}

#[test]
fn test_config_selects_strategies() {
    let config = EngineConfig::new()
        .with_firing(FiringStrategy::Depth)
        .with_ordering(OrderingStrategy::PremiseCountDescending);
    let rules = rule_set(vec![
        Rule::new("R1").then("a", "1"),
        Rule::new("R2").then("b", "1"),
    ]);
    let engine = Engine::with_config(KnowledgeBase::new(rules, FactBase::new()), config);

    let outcome = engine.forward(None).unwrap();

    assert_eq!(outcome.rounds, 2);
    assert_eq!(engine.config().firing, FiringStrategy::Depth);
}

#[test]
fn test_without_gate_forward_hits_conflict() {
    let engine = contradicting_engine(EngineConfig::default());

    let err = engine.forward(None).unwrap_err();

    assert!(matches!(err, EngineError::FactConflict { .. }));
}

#[test]
fn test_gate_refuses_incoherent_facts() {
    let engine = contradicting_engine(EngineConfig::new().checking_facts_first(true));
    let goal = Goal::new("a", "2");

    for err in [
        engine.forward(None).unwrap_err(),
        engine.backward(&goal).unwrap_err(),
        engine.grouped(None).unwrap_err(),
    ] {
        assert_eq!(
            err,
            EngineError::FactIncoherence {
                rule: "R2".to_string(),
                attribute: "a".to_string(),
                existing: "1".to_string(),
                attempted: "2".to_string(),
            }
        );
    }
}

#[test]
fn test_check_facts_reports_without_gate() {
    let engine = contradicting_engine(EngineConfig::default());

    let found = engine.check_facts().unwrap();

    assert_eq!(found.rule, "R2");
    assert_eq!(found.fired_before, vec!["R1"]);
}

#[test]
fn test_check_rules_uses_configured_strictness() {
    let rules = rule_set(vec![
        Rule::new("R1").when("x", "1").then("y", "1"),
        Rule::new("R2").when("z", "1").then("y", "2"),
    ]);
    let mut engine = Engine::new(KnowledgeBase::new(rules, FactBase::new()));

    assert!(engine.check_rules().is_coherent());

    engine.config_mut().strictness = Strictness::Compatible;
    assert!(!engine.check_rules().is_coherent());
}

#[test]
fn test_traced_backward_reports_proof_steps() {
    let engine = Engine::from_json(
        r#"{ "rules": [
            { "id": "R1", "conditions": {}, "conclusion": { "a": "1" } },
            { "id": "R2", "conditions": { "a": "1" }, "conclusion": { "b": "2" } }
        ] }"#,
        "kb.json",
    )
    .unwrap();
    let mut proved = Vec::new();

    {
        let mut tracer = |event: &TraceEvent<'_>| {
            if let TraceEvent::GoalProved { rule, depth, .. } = event {
                proved.push((rule.to_string(), *depth));
            }
        };
        engine
            .backward_traced(&Goal::new("b", "2"), &mut tracer)
            .unwrap();
    }

    assert_eq!(proved, vec![("R1".to_string(), 1), ("R2".to_string(), 0)]);
}
