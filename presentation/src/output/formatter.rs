//! Output formatter trait

use dockerizer_domain::RunResult;

/// Trait for formatting agent run results
pub trait OutputFormatter {
    /// Human-readable summary with the attempt history
    fn format(&self, result: &RunResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &RunResult) -> String;
}
