//! Run Agent use case
//!
//! Iterates generate → write → build → test until an attempt succeeds or
//! `max_attempts` is exhausted:
//!
//! | Step        | Through               | Failure text              |
//! |-------------|-----------------------|---------------------------|
//! | 1. Generate | [`ConfigGenerator`]   | generator error, verbatim |
//! | 2. Write    | `file_write` per file | `failed to write files: …` |
//! | 3. Build    | `docker_build`        | `build failed: …`         |
//! | 4. Test     | `docker_run`          | `test failed: …`          |
//!
//! A failing step ends the attempt; its text is appended to the instructions
//! of the next attempt. Cancellation is checked before every step and aborts
//! the whole run; the error keeps every attempt made so far.

mod events;
mod types;

pub use events::AgentEventEmitter;
pub use types::{RunAgentError, RunAgentInput, feedback_instructions};

use crate::config::ExecutionParams;
use crate::ports::config_generator::{ConfigGenerator, GenerationError};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::shared::check_cancelled;
use chrono::{DateTime, Utc};
use dockerizer_domain::core::string::tail_lines;
use dockerizer_domain::tool::ToolErrorCode;
use dockerizer_domain::{AgentEventType, AgentPhase, Attempt, RunResult, ScanResult, ToolCall};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Log lines appended to a build/test failure in the feedback text.
const FEEDBACK_LOG_LINES: usize = 40;

/// Use case for running the iterative Docker configuration agent
pub struct RunAgentUseCase<T: ToolExecutorPort + 'static, G: ConfigGenerator + 'static> {
    tool_executor: Arc<T>,
    generator: Arc<G>,
    params: ExecutionParams,
    events: AgentEventEmitter,
    cancellation_token: CancellationToken,
}

impl<T, G> Clone for RunAgentUseCase<T, G>
where
    T: ToolExecutorPort + 'static,
    G: ConfigGenerator + 'static,
{
    fn clone(&self) -> Self {
        Self {
            tool_executor: self.tool_executor.clone(),
            generator: self.generator.clone(),
            params: self.params.clone(),
            events: self.events.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

/// Error text of an attempt cut short by cancellation
const INTERRUPTED: &str = "cancelled";

/// How a step ended when it did not succeed.
enum StepFailure {
    /// Attempt-ending failure with its feedback text
    Failed(AgentPhase, String),
    Cancelled(AgentPhase),
}

/// Outcome of one attempt.
enum AttemptEnd {
    Finished(Attempt),
    /// Marked failed at the phase that was running
    Interrupted(Attempt),
}

impl<T: ToolExecutorPort + 'static, G: ConfigGenerator + 'static> RunAgentUseCase<T, G> {
    pub fn new(tool_executor: Arc<T>, generator: Arc<G>) -> Self {
        Self {
            tool_executor,
            generator,
            params: ExecutionParams::default(),
            events: AgentEventEmitter::disabled(),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    /// Attach a progress observer
    pub fn with_events(mut self, events: AgentEventEmitter) -> Self {
        self.events = events;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    pub async fn execute(&self, input: RunAgentInput) -> Result<RunResult, RunAgentError> {
        let max_attempts = self.params.max_attempts;
        if max_attempts == 0 {
            return Err(RunAgentError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        info!(max_attempts, root = %input.scan.root.display(), "Starting agent run");
        self.events.emit_with(
            AgentEventType::Start,
            "Starting agent",
            json!({ "max_attempts": max_attempts }),
        );

        let start_time = Utc::now();
        let mut attempts: Vec<Attempt> = Vec::new();
        let mut instructions = input.instructions.clone();
        let mut final_output = None;

        for number in 1..=max_attempts {
            if self.cancellation_token.is_cancelled() {
                return Err(self.cancelled(start_time, attempts));
            }
            self.events.emit_with(
                AgentEventType::Analyzing,
                format!("Attempt {}/{}: Analyzing project", number, max_attempts),
                json!({ "attempt": number }),
            );

            let attempt = match self.run_attempt(&input.scan, &instructions, number).await {
                AttemptEnd::Finished(attempt) => attempt,
                AttemptEnd::Interrupted(attempt) => {
                    attempts.push(attempt);
                    return Err(self.cancelled(start_time, attempts));
                }
            };

            if attempt.success {
                info!(attempt = number, "Attempt succeeded");
                self.events.emit_with(
                    AgentEventType::Success,
                    "Docker configuration generated successfully",
                    json!({ "attempt": number }),
                );
                final_output = attempt.output.clone();
                attempts.push(attempt);
                break;
            }

            let error = attempt.error.clone().unwrap_or_default();
            info!(attempt = number, phase = ?attempt.failed_phase, "Attempt failed");
            self.events.emit_with(
                AgentEventType::Error,
                format!("Attempt {} failed", number),
                json!({ "attempt": number, "error": error }),
            );
            attempts.push(attempt);

            if number < max_attempts {
                self.events.emit_with(
                    AgentEventType::Fixing,
                    format!("Build failed, analyzing error for fix (attempt {})", number),
                    json!({ "attempt": number, "error": error }),
                );
                instructions = feedback_instructions(&instructions, &error);
            }
        }

        let result = RunResult {
            success: final_output.is_some(),
            start_time,
            end_time: Utc::now(),
            attempts,
            final_output,
        };

        if !result.success {
            warn!(attempts = result.attempt_count(), "Agent exhausted all attempts");
        }
        self.events.emit_with(
            AgentEventType::Complete,
            "Agent completed",
            json!({ "success": result.success, "attempts": result.attempt_count() }),
        );

        Ok(result)
    }

    /// Close a cancelled run, keeping the attempts made so far.
    fn cancelled(&self, start_time: DateTime<Utc>, attempts: Vec<Attempt>) -> RunAgentError {
        let result = RunResult {
            success: false,
            start_time,
            end_time: Utc::now(),
            attempts,
            final_output: None,
        };
        warn!(attempts = result.attempt_count(), "Agent run cancelled");
        self.events.emit_with(
            AgentEventType::Complete,
            "Agent cancelled",
            json!({ "success": false, "cancelled": true, "attempts": result.attempt_count() }),
        );
        RunAgentError::Cancelled(Box::new(result))
    }

    async fn run_attempt(&self, scan: &ScanResult, instructions: &str, number: u32) -> AttemptEnd {
        let mut attempt = Attempt::begin(number, instructions);
        match self.attempt_steps(scan, instructions, &mut attempt).await {
            Ok(()) => AttemptEnd::Finished(attempt.succeed()),
            Err(StepFailure::Failed(phase, text)) => AttemptEnd::Finished(attempt.fail(phase, text)),
            Err(StepFailure::Cancelled(phase)) => {
                AttemptEnd::Interrupted(attempt.fail(phase, INTERRUPTED))
            }
        }
    }

    /// The four steps of an attempt, filling in its output and logs.
    async fn attempt_steps(
        &self,
        scan: &ScanResult,
        instructions: &str,
        attempt: &mut Attempt,
    ) -> Result<(), StepFailure> {
        let cancel = &self.cancellation_token;

        // ==================== Generate ====================
        check_cancelled(cancel, || StepFailure::Cancelled(AgentPhase::Generating))?;
        self.events
            .emit(AgentEventType::Generating, "Generating Docker configuration");
        let files = match self.generator.generate(scan, instructions, cancel).await {
            Ok(files) => files,
            Err(GenerationError::Cancelled) => {
                return Err(StepFailure::Cancelled(AgentPhase::Generating));
            }
            Err(e) => {
                check_cancelled(cancel, || StepFailure::Cancelled(AgentPhase::Generating))?;
                return Err(StepFailure::Failed(AgentPhase::Generating, e.to_string()));
            }
        };
        debug!(files = ?files.file_names(), "Generated file set");
        attempt.output = Some(files.clone());

        // ==================== Write ====================
        check_cancelled(cancel, || StepFailure::Cancelled(AgentPhase::Writing))?;
        if let Err(e) = self.tool_executor.write_file_set(&files, cancel).await {
            if e.code == ToolErrorCode::Cancelled {
                return Err(StepFailure::Cancelled(AgentPhase::Writing));
            }
            return Err(StepFailure::Failed(
                AgentPhase::Writing,
                format!("failed to write files: {}", e.message),
            ));
        }

        // ==================== Build ====================
        check_cancelled(cancel, || StepFailure::Cancelled(AgentPhase::Building))?;
        self.events
            .emit(AgentEventType::Building, "Building Docker image");
        let build = ToolCall::new("docker_build")
            .with_arg("dockerfile", "Dockerfile")
            .with_arg("tag", self.params.image_tag.as_str());
        self.run_step(&build, AgentPhase::Building, "build failed", &mut attempt.build_log)
            .await?;

        // ==================== Test ====================
        check_cancelled(cancel, || StepFailure::Cancelled(AgentPhase::Testing))?;
        self.events.emit(AgentEventType::Testing, "Testing container");
        let test = ToolCall::new("docker_run")
            .with_arg("image", self.params.image_tag.as_str())
            .with_arg("timeout", self.params.test_timeout_secs);
        self.run_step(&test, AgentPhase::Testing, "test failed", &mut attempt.test_log)
            .await
    }

    /// Dispatch one docker step, storing its output in `log`.
    async fn run_step(
        &self,
        call: &ToolCall,
        phase: AgentPhase,
        prefix: &str,
        log: &mut String,
    ) -> Result<(), StepFailure> {
        let (output, outcome) = self
            .tool_executor
            .execute(call, &self.cancellation_token)
            .await
            .into_parts();
        *log = output;

        match outcome {
            Ok(()) => Ok(()),
            Err(e) if e.code == ToolErrorCode::Cancelled || self.cancellation_token.is_cancelled() => {
                Err(StepFailure::Cancelled(phase))
            }
            Err(e) => {
                let mut text = format!("{}: {}", prefix, e.message);
                let tail = tail_lines(log, FEEDBACK_LOG_LINES);
                if !tail.is_empty() {
                    text.push('\n');
                    text.push_str(tail);
                }
                Err(StepFailure::Failed(phase, text))
            }
        }
    }
}
