//! Concrete tools
//!
//! | Tool                  | Module    | Risk |
//! |-----------------------|-----------|------|
//! | `docker_build`        | [`docker`] | High |
//! | `docker_run`          | [`docker`] | High |
//! | `docker_logs`         | [`docker`] | Low  |
//! | `docker_stop`         | [`docker`] | High |
//! | `file_read`           | [`file`]   | Low  |
//! | `file_write`          | [`file`]   | High |
//! | `shell`               | [`shell`]  | High |
//! | `dockerizer_analyze`  | [`stack`]  | Low  |
//! | `dockerizer_generate` | [`stack`]  | Low  |
//!
//! Every tool decodes its own argument struct first and reaches the host only
//! through the [`PathSandbox`], the command policy or fixed docker argv.

pub mod docker;
pub mod file;
pub mod shell;
pub mod stack;

use crate::sandbox::PathSandbox;
use dockerizer_application::ports::process_runner::{ProcessError, ProcessOutput, ProcessRunner};
use dockerizer_application::ports::stack_pipeline::StackPipeline;
use dockerizer_application::ports::tool::Tool;
use dockerizer_domain::tool::{ToolError, ToolResult};
use std::sync::Arc;

/// The full tool set, bound to one sandbox root.
pub fn default_tools(
    sandbox: Arc<PathSandbox>,
    runner: Arc<dyn ProcessRunner>,
    pipeline: Arc<dyn StackPipeline>,
) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(docker::DockerBuildTool::new(sandbox.clone(), runner.clone())),
        Arc::new(docker::DockerRunTool::new(sandbox.clone(), runner.clone())),
        Arc::new(docker::DockerLogsTool::new(sandbox.clone(), runner.clone())),
        Arc::new(docker::DockerStopTool::new(sandbox.clone(), runner.clone())),
        Arc::new(file::FileReadTool::new(sandbox.clone())),
        Arc::new(file::FileWriteTool::new(sandbox.clone())),
        Arc::new(shell::ShellTool::new(sandbox.clone(), runner)),
        Arc::new(stack::AnalyzeTool::new(sandbox.clone(), pipeline.clone())),
        Arc::new(stack::GenerateTool::new(sandbox, pipeline)),
    ]
}

/// Map a runner error onto a failed result.
pub(crate) fn process_failure(tool: &str, err: ProcessError) -> ToolResult {
    let error = match err {
        ProcessError::Cancelled { program } => ToolError::cancelled(program),
        other => ToolError::execution_failed(other.to_string()),
    };
    ToolResult::failure(tool, error)
}

/// Success on exit 0; otherwise a failure carrying the captured output.
pub(crate) fn completed(tool: &str, action: &str, output: ProcessOutput) -> ToolResult {
    let combined = output.combined();
    let result = if output.success() {
        ToolResult::success(tool, combined)
    } else {
        ToolResult::failure(
            tool,
            ToolError::execution_failed(format!("{} failed: {}", action, output.status_text())),
        )
        .with_output(combined)
    };
    result.with_exit_code(output.status)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fake for the process runner port.

    use async_trait::async_trait;
    use dockerizer_application::ports::process_runner::{
        ProcessError, ProcessOutput, ProcessRunner,
    };
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedRun {
        pub program: String,
        pub args: Vec<String>,
        pub cwd: PathBuf,
        pub input: Option<String>,
    }

    impl RecordedRun {
        pub fn argv(&self) -> String {
            std::iter::once(self.program.as_str())
                .chain(self.args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// Returns scripted outputs in order, then exit-0 with empty output.
    #[derive(Default)]
    pub struct RecordingRunner {
        responses: Mutex<VecDeque<Result<ProcessOutput, ProcessError>>>,
        pub runs: Mutex<Vec<RecordedRun>>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, output: ProcessOutput) -> Self {
            self.responses.lock().unwrap().push_back(Ok(output));
            self
        }

        pub fn fail(self, err: ProcessError) -> Self {
            self.responses.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn argvs(&self) -> Vec<String> {
            self.runs.lock().unwrap().iter().map(RecordedRun::argv).collect()
        }
    }

    #[async_trait]
    impl ProcessRunner for RecordingRunner {
        async fn run_with_input(
            &self,
            program: &str,
            args: &[String],
            cwd: &Path,
            input: Option<&str>,
            _cancel: &CancellationToken,
        ) -> Result<ProcessOutput, ProcessError> {
            self.runs.lock().unwrap().push(RecordedRun {
                program: program.to_string(),
                args: args.to_vec(),
                cwd: cwd.to_path_buf(),
                input: input.map(String::from),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ProcessOutput::new(Some(0), "", "")))
        }
    }
}
