use thiserror::Error;

/// Error types for the chaining engines
///
/// Every variant is fatal for the call that produced it. Structural rule
/// incoherence is not an error: it is reported through
/// [`crate::consistency::RuleIncoherenceReport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A fact insertion contradicted the value already held for the attribute
    #[error("Fact conflict on '{attribute}': holds '{existing}', cannot assert '{attempted}'")]
    FactConflict {
        attribute: String,
        existing: String,
        attempted: String,
    },

    /// An ordering or firing strategy name that does not exist
    #[error("Unknown {kind} '{name}' (expected one of: {expected})")]
    UnknownCriterion {
        kind: &'static str,
        name: String,
        expected: String,
    },

    /// Grouping could not place the remaining rules in any group
    #[error("Cycle or deadlock in rule dependencies, cannot group: {}", .pending.join(", "))]
    CycleOrDeadlock { pending: Vec<String> },

    /// The fact-level consistency check found a rule contradicting a fact
    #[error(
        "Fact incoherence: rule '{rule}' asserts {attribute}={attempted} while {attribute}={existing} holds"
    )]
    FactIncoherence {
        rule: String,
        attribute: String,
        existing: String,
        attempted: String,
    },

    /// Two rules share the same identifier
    #[error("Duplicate rule id '{0}'")]
    DuplicateRule(String),

    /// The knowledge base source could not be read or decoded
    #[error("Load error in {source_id}: {message}")]
    Load {
        source_id: String,
        message: String,
        /// 1-based line and column when the decoder reported one
        location: Option<(usize, usize)>,
    },
}

impl EngineError {
    pub fn load(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            source_id: source_id.into(),
            message: message.into(),
            location: None,
        }
    }

    pub(crate) fn unknown_criterion(
        kind: &'static str,
        name: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        Self::UnknownCriterion {
            kind,
            name: name.into(),
            expected: expected.join(", "),
        }
    }
}

