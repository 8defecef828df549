//! Type definitions for the RunAgent use case.

use dockerizer_domain::{RunResult, ScanResult};
use thiserror::Error;

/// Errors that end a run early.
///
/// Failed attempts are not errors: they are recorded in the result.
#[derive(Error, Debug, Clone)]
pub enum RunAgentError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Carries the attempts made so far; the interrupted one is last.
    #[error("Operation cancelled after {} attempt(s)", .0.attempt_count())]
    Cancelled(Box<RunResult>),
}

impl RunAgentError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunAgentError::Cancelled(_))
    }

    /// History of a cancelled run
    pub fn partial_result(&self) -> Option<&RunResult> {
        match self {
            RunAgentError::Cancelled(result) => Some(result),
            RunAgentError::InvalidConfig(_) => None,
        }
    }
}

/// Input for the RunAgent use case
#[derive(Debug, Clone)]
pub struct RunAgentInput {
    /// Workspace snapshot, forwarded to the generator untouched
    pub scan: ScanResult,
    /// Initial instructions for the first attempt
    pub instructions: String,
}

impl RunAgentInput {
    pub fn new(scan: ScanResult, instructions: impl Into<String>) -> Self {
        Self {
            scan,
            instructions: instructions.into(),
        }
    }
}

/// Instructions for the attempt after a failed one.
pub fn feedback_instructions(instructions: &str, error: &str) -> String {
    format!(
        "{}\n\nPrevious attempt failed with error:\n{}\n\nPlease fix this issue.",
        instructions, error
    )
}
