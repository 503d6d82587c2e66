use ariadne::{Color, Label, Report, ReportKind, Source};
use chaining::EngineError;
use thiserror::Error;

/// An engine error raised while decoding `source_text`
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SourcedError {
    pub error: EngineError,
    pub source_text: String,
}

/// Format an EngineError for the terminal, with an Ariadne report when the
/// error points into known source text
pub fn format_error(error: &EngineError, source_text: Option<&str>) -> String {
    match error {
        EngineError::Load {
            source_id,
            message,
            location: Some((line, column)),
        } => match source_text {
            Some(text) => render_load_error(source_id, message, *line, *column, text)
                .unwrap_or_else(|| format!("{}", error)),
            None => format!("{} (line {}, column {})", error, line, column),
        },
        EngineError::Load { .. } => format!("{}", error),
        EngineError::FactConflict { .. } => format!(
            "{}\n  Two rules, or a rule and an initial fact, disagree on this attribute.\n  Run `chaining check` to locate the rules involved.",
            error
        ),
        EngineError::FactIncoherence { .. } => format!(
            "{}\n  The initial facts contradict what the rules derive; no run was attempted.",
            error
        ),
        EngineError::CycleOrDeadlock { .. } => format!(
            "{}\n  These rules depend on each other and no initial fact satisfies any of them.",
            error
        ),
        EngineError::UnknownCriterion { .. } | EngineError::DuplicateRule(_) => {
            format!("Error: {}", error)
        }
    }
}

fn render_load_error(
    source_id: &str,
    message: &str,
    line: usize,
    column: usize,
    text: &str,
) -> Option<String> {
    let total = text.chars().count();
    let start = char_offset(text, line, column).min(total.saturating_sub(1));
    let end = (start + 1).min(total.max(1));

    let report = Report::build(ReportKind::Error, source_id, start)
        .with_message(format!(
            "Load error: {} ({}:{}:{})",
            message, source_id, line, column
        ))
        .with_label(
            Label::new((source_id, start..end))
                .with_message("invalid knowledge base")
                .with_color(Color::Red),
        )
        .with_help("a knowledge base is an object with \"facts\" and a \"rules\" array");

    let mut output = Vec::new();
    report
        .finish()
        .write((source_id, Source::from(text)), &mut output)
        .ok()?;
    Some(String::from_utf8_lossy(&output).to_string())
}

/// Character offset of a 1-based line and column
fn char_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, content) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return offset + column.saturating_sub(1).min(content.chars().count());
        }
        offset += content.chars().count();
    }
    offset
}
