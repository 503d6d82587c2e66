//! Backward chaining
//!
//! Proves a goal by recursively proving the conditions of a rule that
//! concludes it. Rules are stored once; every candidate attempt works on its
//! own copy of an availability mask with the candidate switched off, so a rule
//! can never be used to justify its own premises and the recursion depth is
//! bounded by the number of rules.
//!
//! The first candidate whose conditions are all provable wins. Attempts that
//! failed are dropped: an unprovable node never carries children or a rule.

use crate::trace::{TraceEvent, Tracer};
use crate::{FactBase, Goal, OrderingStrategy, RuleSet};
use serde::Serialize;
use tracing::trace;

/// One node of a proof tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofNode {
    pub goal: Goal,
    pub provable: bool,
    /// Rule that proved the goal, `None` for fact leaves and failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// One child per condition of `rule`, in condition order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProofNode>,
}

impl ProofNode {
    pub fn fact(goal: Goal) -> Self {
        Self {
            goal,
            provable: true,
            rule: None,
            children: Vec::new(),
        }
    }

    pub fn unprovable(goal: Goal) -> Self {
        Self {
            goal,
            provable: false,
            rule: None,
            children: Vec::new(),
        }
    }

    pub fn proved(goal: Goal, rule: impl Into<String>, children: Vec<ProofNode>) -> Self {
        Self {
            goal,
            provable: true,
            rule: Some(rule.into()),
            children,
        }
    }

    /// Rule ids used by the proof, in pre-order
    pub fn rules_used(&self) -> Vec<&str> {
        let mut rules = Vec::new();
        self.collect_rules(&mut rules);
        rules
    }

    fn collect_rules<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(rule) = &self.rule {
            out.push(rule);
        }
        for child in &self.children {
            child.collect_rules(out);
        }
    }

    /// Height of the tree, a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(ProofNode::depth).max().unwrap_or(0)
    }
}

/// Try to prove `goal` from `facts` and `rules`
///
/// Neither `rules` nor `facts` is modified.
pub fn backward_chain(
    rules: &RuleSet,
    facts: &FactBase,
    goal: &Goal,
    ordering: OrderingStrategy,
    tracer: &mut dyn Tracer,
) -> (bool, ProofNode) {
    let mut prover = Prover {
        rules,
        facts,
        ordering,
        tracer,
    };
    let all_available = vec![true; rules.len()];
    let tree = prover.prove(&all_available, goal, 0);
    trace!(%goal, provable = tree.provable, "backward chaining done");
    (tree.provable, tree)
}

struct Prover<'a, 't> {
    rules: &'a RuleSet,
    facts: &'a FactBase,
    ordering: OrderingStrategy,
    tracer: &'t mut dyn Tracer,
}

impl Prover<'_, '_> {
    /// `available[i]` tells whether the rule at pool index `i` may still be used
    fn prove(&mut self, available: &[bool], goal: &Goal, depth: usize) -> ProofNode {
        if self.facts.satisfies(goal) {
            trace!(%goal, depth, "goal is a fact");
            self.tracer.on_event(&TraceEvent::GoalIsFact { goal, depth });
            return ProofNode::fact(goal.clone());
        }

        let mut candidates: Vec<usize> = available
            .iter()
            .enumerate()
            .filter(|(_, usable)| **usable)
            .map(|(index, _)| index)
            .filter(|&index| {
                self.rules
                    .get_index(index)
                    .is_some_and(|rule| rule.concludes(goal))
            })
            .collect();

        if candidates.is_empty() {
            trace!(%goal, depth, "no rule concludes goal");
            self.tracer
                .on_event(&TraceEvent::GoalUnreachable { goal, depth });
            return ProofNode::unprovable(goal.clone());
        }

        let rules = self.rules;
        self.ordering
            .sort_with(&mut candidates, |&index| rules.get_index(index), self.facts);

        for &index in &candidates {
            let Some(rule) = rules.get_index(index) else {
                continue;
            };

            let mut branch = available.to_vec();
            branch[index] = false;

            let mut children = Vec::with_capacity(rule.conditions.len());
            let mut failed = None;
            for (attribute, value) in &rule.conditions {
                let condition = Goal::new(attribute.as_str(), value.as_str());
                let child = self.prove(&branch, &condition, depth + 1);
                if !child.provable {
                    failed = Some(condition);
                    break;
                }
                children.push(child);
            }

            match failed {
                None => {
                    trace!(%goal, rule = %rule.id, depth, "goal proved");
                    self.tracer.on_event(&TraceEvent::GoalProved {
                        goal,
                        rule: &rule.id,
                        depth,
                    });
                    return ProofNode::proved(goal.clone(), rule.id.as_str(), children);
                }
                Some(condition) => {
                    trace!(%goal, rule = %rule.id, %condition, depth, "candidate rejected");
                    self.tracer.on_event(&TraceEvent::CandidateRejected {
                        goal,
                        rule: &rule.id,
                        condition: &condition,
                        depth,
                    });
                }
            }
        }

        let tried: Vec<String> = candidates
            .iter()
            .filter_map(|&index| rules.get_index(index))
            .map(|rule| rule.id.clone())
            .collect();
        self.tracer.on_event(&TraceEvent::CandidatesExhausted {
            goal,
            candidates: &tried,
            depth,
        });
        ProofNode::unprovable(goal.clone())
    }
}
