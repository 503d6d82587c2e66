//! # Chaining Engine
//!
//! **Propositional rule inference over attribute=value facts**
//!
//! A knowledge base is a set of facts (`attribute = value`) and production
//! rules (`conditions => conclusion`, both conjunctions of pairs). The engine
//! answers three questions:
//!
//! - what can be derived, by forward chaining (to saturation or to a goal);
//! - is a goal provable, by backward chaining, with a proof tree;
//! - are the rules, and the facts with respect to the rules, consistent.
//!
//! ## Quick Start
//!
//! ```rust
//! use chaining::{Engine, EngineResult, Goal};
//!
//! fn main() -> EngineResult<()> {
//!     let engine = Engine::from_json(r#"{
//!         "facts": {},
//!         "rules": [
//!             { "id": "R1", "conditions": {}, "conclusion": { "a": "1" } },
//!             { "id": "R2", "conditions": { "a": "1" }, "conclusion": { "b": "2" } }
//!         ]
//!     }"#, "example.json")?;
//!
//!     let outcome = engine.forward(None)?;
//!     assert_eq!(outcome.facts.get("b"), Some("2"));
//!
//!     let (provable, proof) = engine.backward(&Goal::new("b", "2"))?;
//!     assert!(provable);
//!     assert_eq!(proof.rules_used(), vec!["R2", "R1"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Engines
//!
//! ### Forward chaining
//! Fires eligible rules round by round, either all of them (breadth) or the
//! first one (depth), after ordering them with a conflict-resolution
//! strategy. A fired rule never fires again in the same run.
//!
//! ### Backward chaining
//! Proves a goal from the rules concluding it. Each attempt works on its own
//! view of the rule pool without the rule being tried.
//!
//! ### Grouped resolution
//! Layers rules by their dependencies and fires the layers in order.
//!
//! ### Consistency
//! Detects rules that reach different values of an attribute from the same
//! inputs, and facts that the rules would contradict.

pub mod backward;
pub mod config;
pub mod consistency;
pub mod engine;
pub mod error;
pub mod forward;
pub mod grouping;
pub mod knowledge;
pub mod loader;
pub mod response;
pub mod strategy;
pub mod trace;

pub use backward::{backward_chain, ProofNode};
pub use config::EngineConfig;
pub use consistency::{
    check_fact_consistency, find_fact_incoherence, find_rule_incoherence, ConflictKind,
    Derivation, FactIncoherence, RuleConflict, RuleIncoherenceReport, Strictness,
};
pub use engine::Engine;
pub use error::EngineError;
pub use forward::forward_chain;
pub use grouping::{predecessors, resolve_by_groups, rule_groups};
pub use knowledge::{Assignments, FactBase, Goal, KnowledgeBase, Rule, RuleSet};
pub use loader::load_json;
pub use response::{ForwardOutcome, GroupedOutcome, Termination};
pub use strategy::{eligible_rules, FiringStrategy, OrderingStrategy};
pub use trace::{NoTrace, TraceEvent, Tracer};

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests;
