//! Agent loop entities

use super::file_set::FileSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Step of one attempt, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// Producing the file set from the scan and instructions
    Generating,
    /// Writing the file set into the workspace
    Writing,
    /// `docker build`
    Building,
    /// Starting the built image and checking it stays up
    Testing,
}

impl AgentPhase {
    pub fn as_str(&self) -> &str {
        match self {
            AgentPhase::Generating => "generating",
            AgentPhase::Writing => "writing",
            AgentPhase::Building => "building",
            AgentPhase::Testing => "testing",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            AgentPhase::Generating => "Generating",
            AgentPhase::Writing => "Writing files",
            AgentPhase::Building => "Building",
            AgentPhase::Testing => "Testing",
        }
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One iteration of the agent loop.
///
/// Finalized exactly once with [`Attempt::succeed`] or [`Attempt::fail`]; the
/// loop never touches an attempt after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// 1-based attempt number
    pub number: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub success: bool,
    /// Failure text fed into the next attempt's instructions
    pub error: Option<String>,
    /// Step that failed
    pub failed_phase: Option<AgentPhase>,
    /// Files produced by generation (absent when generation failed)
    pub output: Option<FileSet>,
    pub build_log: String,
    pub test_log: String,
    /// Instructions this attempt was generated from
    pub instructions: String,
}

impl Attempt {
    pub fn begin(number: u32, instructions: impl Into<String>) -> Self {
        Self {
            number,
            start_time: Utc::now(),
            end_time: None,
            success: false,
            error: None,
            failed_phase: None,
            output: None,
            build_log: String::new(),
            test_log: String::new(),
            instructions: instructions.into(),
        }
    }

    pub fn succeed(mut self) -> Self {
        self.success = true;
        self.end_time = Some(Utc::now());
        self
    }

    pub fn fail(mut self, phase: AgentPhase, error: impl Into<String>) -> Self {
        self.success = false;
        self.failed_phase = Some(phase);
        self.error = Some(error.into());
        self.end_time = Some(Utc::now());
        self
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds())
    }
}

/// Outcome of a whole agent run, with the full attempt history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub attempts: Vec<Attempt>,
    /// File set of the successful attempt
    pub final_output: Option<FileSet>,
}

impl RunResult {
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.attempts.last().and_then(|a| a.error.as_deref())
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }
}
