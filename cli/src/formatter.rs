use chaining::{
    Assignments, Derivation, FactBase, FactIncoherence, ForwardOutcome, Goal, GroupedOutcome,
    KnowledgeBase, ProofNode, RuleIncoherenceReport, Termination, TraceEvent,
};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};

enum Branch {
    Middle,
    Last,
}

impl Branch {
    fn symbol(&self) -> &'static str {
        match self {
            Branch::Middle => "├─ ",
            Branch::Last => "└─ ",
        }
    }

    /// Prefix continuing below this branch
    fn continuation(&self) -> &'static str {
        match self {
            Branch::Middle => "│  ",
            Branch::Last => "   ",
        }
    }
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_forward(
        &self,
        outcome: &ForwardOutcome,
        initial: &FactBase,
        goal: Option<&Goal>,
    ) -> String {
        let mut output = String::new();

        output.push_str(&self.format_facts_table(&outcome.facts, Some(initial)));
        output.push('\n');

        if outcome.fired.is_empty() {
            output.push_str("No rule fired\n");
        } else {
            output.push_str(&format!(
                "Fired {} ({} round{})\n",
                outcome.fired.join(", "),
                outcome.rounds,
                if outcome.rounds == 1 { "" } else { "s" }
            ));
        }

        match (outcome.termination, goal) {
            (Termination::GoalReached, Some(goal)) => {
                output.push_str(&format!("Goal {} reached\n", goal))
            }
            (Termination::NoProgress, Some(goal)) => output.push_str(&format!(
                "Goal {} not reached: no rule left to fire\n",
                goal
            )),
            _ => output.push_str("Saturated: no rule left to fire\n"),
        }

        output
    }

    pub fn format_proof(&self, proof: &ProofNode) -> String {
        let mut output = if proof.provable {
            format!("Goal {} is provable\n\n", proof.goal)
        } else {
            format!("Goal {} is not provable\n\n", proof.goal)
        };

        output.push_str(&self.proof_label(proof));
        output.push('\n');
        self.format_proof_children(proof, "", &mut output);
        output
    }

    fn format_proof_children(&self, node: &ProofNode, prefix: &str, output: &mut String) {
        for (i, child) in node.children.iter().enumerate() {
            let branch = if i + 1 == node.children.len() {
                Branch::Last
            } else {
                Branch::Middle
            };
            output.push_str(&format!(
                "{}{}{}\n",
                prefix,
                branch.symbol(),
                self.proof_label(child)
            ));
            let nested = format!("{}{}", prefix, branch.continuation());
            self.format_proof_children(child, &nested, output);
        }
    }

    fn proof_label(&self, node: &ProofNode) -> String {
        match (&node.rule, node.provable) {
            (Some(rule), _) => format!("✔ {} [{}]", node.goal, rule),
            (None, true) => format!("✔ {} (fact)", node.goal),
            (None, false) => format!("✘ {}", node.goal),
        }
    }

    pub fn format_grouped(
        &self,
        outcome: &GroupedOutcome,
        initial: &FactBase,
        goal: Option<&Goal>,
    ) -> String {
        let mut output = String::new();

        for (index, group) in outcome.groups.iter().enumerate() {
            let marker = if index < outcome.applied_groups {
                "applied"
            } else {
                "skipped"
            };
            output.push_str(&format!(
                "Group {}: {} ({})\n",
                index,
                group.join(", "),
                marker
            ));
        }
        output.push('\n');

        output.push_str(&self.format_facts_table(&outcome.facts, Some(initial)));
        output.push('\n');

        if let (Some(goal), Some(reached)) = (goal, outcome.goal_reached) {
            if reached {
                output.push_str(&format!(
                    "Goal {} reached after {} group(s)\n",
                    goal, outcome.applied_groups
                ));
            } else {
                output.push_str(&format!("Goal {} not reached\n", goal));
            }
        }

        output
    }

    pub fn format_check(
        &self,
        report: &RuleIncoherenceReport,
        fact_incoherence: Option<&FactIncoherence>,
    ) -> String {
        let mut output = String::new();

        if report.askable.is_empty() {
            output.push_str("Askable attributes: none\n");
        } else {
            output.push_str(&format!(
                "Askable attributes: {}\n",
                report.askable.join(", ")
            ));
        }

        if report.is_coherent() {
            output.push_str("Rules are coherent\n");
        } else {
            output.push_str(&format!(
                "Rules are incoherent ({} conflict{}):\n",
                report.conflicts.len(),
                if report.conflicts.len() == 1 { "" } else { "s" }
            ));

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(Row::from(vec![
                Cell::new("Attribute"),
                Cell::new("Value"),
                Cell::new("From"),
                Cell::new("Value"),
                Cell::new("From"),
            ]));
            for conflict in &report.conflicts {
                table.add_row(Row::from(vec![
                    conflict.attribute.clone(),
                    conflict.left_value.clone(),
                    derivation_text(&conflict.left),
                    conflict.right_value.clone(),
                    derivation_text(&conflict.right),
                ]));
            }
            output.push_str(&table.to_string());
            output.push('\n');
        }

        if !report.unexplored.is_empty() {
            output.push_str(&format!(
                "Not reachable from askable attributes: {}\n",
                report.unexplored.join(", ")
            ));
        }

        match fact_incoherence {
            None => output.push_str("Facts are consistent with the rules\n"),
            Some(found) => {
                output.push_str(&format!(
                    "Facts are incoherent: rule {} asserts {}={} while {}={} holds",
                    found.rule, found.attribute, found.attempted, found.attribute, found.existing
                ));
                if !found.fired_before.is_empty() {
                    output.push_str(&format!(" (after {})", found.fired_before.join(", ")));
                }
                output.push('\n');
            }
        }

        output
    }

    pub fn format_knowledge(&self, knowledge: &KnowledgeBase) -> String {
        let mut output = String::new();

        output.push_str(&format!("facts ({}):\n", knowledge.facts.len()));
        if !knowledge.facts.is_empty() {
            output.push_str(&self.format_facts_table(&knowledge.facts, None));
            output.push('\n');
        }

        output.push_str(&format!("\nrules ({}):\n", knowledge.rules.len()));
        if !knowledge.rules.is_empty() {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(Row::from(vec![
                Cell::new("Rule"),
                Cell::new("Conditions"),
                Cell::new("Conclusion"),
            ]));
            for rule in knowledge.rules.iter() {
                let conditions = if rule.conditions.is_empty() {
                    "true".to_string()
                } else {
                    assignments_text(&rule.conditions)
                };
                table.add_row(Row::from(vec![
                    rule.id.clone(),
                    conditions,
                    assignments_text(&rule.conclusion),
                ]));
            }
            output.push_str(&table.to_string());
            output.push('\n');
        }

        output
    }

    /// One line per engine step, indented by proof depth for backward chaining
    pub fn format_event(&self, event: &TraceEvent<'_>) -> String {
        match event {
            TraceEvent::RoundStarted {
                round,
                eligible,
                facts,
                ..
            } => format!(
                "Round {}: eligible [{}] with facts {}",
                round,
                eligible.join(", "),
                facts
            ),
            TraceEvent::RuleFired {
                rule, conclusion, ..
            } => format!("  fire {} => {}", rule, assignments_text(conclusion)),
            TraceEvent::GoalIsFact { goal, depth } => {
                format!("{}{} is a fact", indent(*depth), goal)
            }
            TraceEvent::GoalUnreachable { goal, depth } => {
                format!("{}{}: no rule concludes it", indent(*depth), goal)
            }
            TraceEvent::CandidateRejected {
                goal,
                rule,
                condition,
                depth,
            } => format!(
                "{}{}: {} rejected, {} not provable",
                indent(*depth),
                goal,
                rule,
                condition
            ),
            TraceEvent::GoalProved { goal, rule, depth } => {
                format!("{}{} proved by {}", indent(*depth), goal, rule)
            }
            TraceEvent::CandidatesExhausted {
                goal,
                candidates,
                depth,
            } => format!(
                "{}{}: every candidate failed ({})",
                indent(*depth),
                goal,
                candidates.join(", ")
            ),
            TraceEvent::GroupApplied {
                index,
                group,
                fired,
                facts,
            } => format!(
                "Group {} [{}]: fired [{}], facts {}",
                index,
                group.join(", "),
                fired.join(", "),
                facts
            ),
        }
    }

    /// Facts in insertion order; with `initial`, derived facts are marked
    fn format_facts_table(&self, facts: &FactBase, initial: Option<&FactBase>) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![
            Cell::new("Attribute").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Left),
        ];
        if initial.is_some() {
            header.push(Cell::new("Origin").set_alignment(CellAlignment::Left));
        }
        table.set_header(Row::from(header));

        for (attribute, value) in facts.iter() {
            let mut row = vec![attribute.to_string(), value.to_string()];
            if let Some(initial) = initial {
                let origin = if initial.holds(attribute, value) {
                    "initial"
                } else {
                    "derived"
                };
                row.push(origin.to_string());
            }
            table.add_row(Row::from(row));
        }

        table.to_string()
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn assignments_text(pairs: &Assignments) -> String {
    pairs
        .iter()
        .map(|(attribute, value)| format!("{}={}", attribute, value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn derivation_text(derivation: &Derivation) -> String {
    if derivation.is_empty() {
        return "true".to_string();
    }
    derivation
        .iter()
        .map(|(attribute, value)| format!("{}={}", attribute, value))
        .collect::<Vec<_>>()
        .join(", ")
}
