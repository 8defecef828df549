//! Docker tools: docker_build, docker_run, docker_logs, docker_stop
//!
//! All of them run the docker CLI with a fixed argv shape; AI-supplied values
//! are validated as names/paths and passed as separate arguments.

use super::{completed, process_failure};
use crate::process::DOCKER;
use crate::sandbox::PathSandbox;
use async_trait::async_trait;
use dockerizer_application::config::MAX_TEST_TIMEOUT_SECS;
use dockerizer_application::ports::process_runner::ProcessRunner;
use dockerizer_application::ports::tool::Tool;
use dockerizer_domain::tool::names::{validate_container_name, validate_image_reference, validate_tail};
use dockerizer_domain::tool::{
    RiskLevel, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Tool name constants
pub const DOCKER_BUILD: &str = "docker_build";
pub const DOCKER_RUN: &str = "docker_run";
pub const DOCKER_LOGS: &str = "docker_logs";
pub const DOCKER_STOP: &str = "docker_stop";

const DEFAULT_DOCKERFILE: &str = "Dockerfile";
const DEFAULT_BUILD_TAG: &str = "dockerize-build:latest";
const DEFAULT_RUN_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_TAIL: &str = "100";

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ==================== docker_build ====================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildArgs {
    #[serde(default = "default_dockerfile")]
    dockerfile: String,
    #[serde(default = "default_build_tag")]
    tag: String,
}

fn default_dockerfile() -> String {
    DEFAULT_DOCKERFILE.to_string()
}

fn default_build_tag() -> String {
    DEFAULT_BUILD_TAG.to_string()
}

/// `docker build -f <dockerfile> -t <tag> .` in the sandbox root.
pub struct DockerBuildTool {
    sandbox: Arc<PathSandbox>,
    runner: Arc<dyn ProcessRunner>,
}

impl DockerBuildTool {
    pub fn new(sandbox: Arc<PathSandbox>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { sandbox, runner }
    }
}

#[async_trait]
impl Tool for DockerBuildTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(DOCKER_BUILD, self.description(), RiskLevel::High)
            .with_parameter(
                ToolParameter::new("dockerfile", "Dockerfile path (default: Dockerfile)", false)
                    .with_type("path"),
            )
            .with_parameter(ToolParameter::new(
                "tag",
                "Image tag (default: dockerize-build:latest)",
                false,
            ))
    }

    fn name(&self) -> &str {
        DOCKER_BUILD
    }

    fn description(&self) -> &str {
        "Build a Docker image from Dockerfile"
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let args: BuildArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(DOCKER_BUILD, e),
        };
        let dockerfile = match self.sandbox.resolve(&args.dockerfile) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(DOCKER_BUILD, e.into()),
        };
        if let Err(e) = validate_image_reference(&args.tag) {
            return ToolResult::failure(DOCKER_BUILD, e.into());
        }

        let argv = vec![
            "build".to_string(),
            "-f".to_string(),
            dockerfile.to_string_lossy().into_owned(),
            "-t".to_string(),
            args.tag,
            ".".to_string(),
        ];
        match self.runner.run(DOCKER, &argv, self.sandbox.root(), cancel).await {
            Ok(output) => completed(DOCKER_BUILD, "docker build", output),
            Err(e) => process_failure(DOCKER_BUILD, e),
        }
    }
}

// ==================== docker_run ====================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunArgs {
    image: String,
    /// Seconds the container must stay up
    #[serde(default)]
    timeout: Option<u64>,
}

static CONTAINER_SEQ: AtomicU64 = AtomicU64::new(0);

fn test_container_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = CONTAINER_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("dockerize-test-{}-{}-{}", nanos, std::process::id(), seq)
}

/// Start an image detached, wait, and check it is still running.
///
/// The test container is always removed, whatever the outcome.
pub struct DockerRunTool {
    sandbox: Arc<PathSandbox>,
    runner: Arc<dyn ProcessRunner>,
}

impl DockerRunTool {
    pub fn new(sandbox: Arc<PathSandbox>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { sandbox, runner }
    }

    async fn remove(&self, name: &str) {
        // Cleanup runs even after the caller's token fired
        let cleanup = CancellationToken::new();
        let argv = args(&["rm", "-f", name]);
        match self.runner.run(DOCKER, &argv, self.sandbox.root(), &cleanup).await {
            Ok(output) if output.success() => debug!(container = name, "Removed test container"),
            Ok(output) => warn!(container = name, status = %output.status_text(), "Failed to remove test container"),
            Err(e) => warn!(container = name, error = %e, "Failed to remove test container"),
        }
    }

    async fn run_checked(
        &self,
        name: &str,
        image: &str,
        wait: Duration,
        cancel: &CancellationToken,
    ) -> ToolResult {
        let root = self.sandbox.root();

        let start = args(&["run", "-d", "--name", name, image]);
        let started = match self.runner.run(DOCKER, &start, root, cancel).await {
            Ok(output) => output,
            Err(e) => return process_failure(DOCKER_RUN, e),
        };
        if !started.success() {
            return ToolResult::failure(
                DOCKER_RUN,
                ToolError::execution_failed(format!("docker run failed: {}", started.status_text())),
            )
            .with_output(started.combined())
            .with_exit_code(started.status);
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                return ToolResult::failure(DOCKER_RUN, ToolError::cancelled(DOCKER_RUN));
            }
            _ = tokio::time::sleep(wait) => {}
        }

        let inspect = args(&["inspect", "--format", "{{.State.Status}}", name]);
        let inspected = match self.runner.run(DOCKER, &inspect, root, cancel).await {
            Ok(output) => output,
            Err(e) => return process_failure(DOCKER_RUN, e),
        };
        if !inspected.success() {
            return ToolResult::failure(
                DOCKER_RUN,
                ToolError::execution_failed(format!(
                    "docker inspect failed: {}",
                    inspected.status_text()
                )),
            )
            .with_output(inspected.combined());
        }

        let status = inspected.stdout.trim().to_string();
        if status == "running" {
            return ToolResult::success(DOCKER_RUN, "Container started and ran successfully");
        }

        let logs = args(&["logs", name]);
        let log_text = match self.runner.run(DOCKER, &logs, root, cancel).await {
            Ok(output) => output.combined(),
            Err(e) => return process_failure(DOCKER_RUN, e),
        };
        ToolResult::failure(
            DOCKER_RUN,
            ToolError::execution_failed(format!("container exited with status: {}", status)),
        )
        .with_output(log_text)
    }
}

#[async_trait]
impl Tool for DockerRunTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(DOCKER_RUN, self.description(), RiskLevel::High)
            .with_parameter(ToolParameter::new("image", "Image to run", true))
            .with_parameter(
                ToolParameter::new(
                    "timeout",
                    "Seconds the container must stay up (default: 30, max: 300)",
                    false,
                )
                .with_type("number"),
            )
    }

    fn name(&self) -> &str {
        DOCKER_RUN
    }

    fn description(&self) -> &str {
        "Run a Docker container for testing"
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let args: RunArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(DOCKER_RUN, e),
        };
        if let Err(e) = validate_image_reference(&args.image) {
            return ToolResult::failure(DOCKER_RUN, e.into());
        }

        let secs = args
            .timeout
            .unwrap_or(DEFAULT_RUN_TIMEOUT_SECS)
            .min(MAX_TEST_TIMEOUT_SECS);
        let name = test_container_name();
        debug!(container = %name, image = %args.image, wait_secs = secs, "Starting test container");

        let result = self
            .run_checked(&name, &args.image, Duration::from_secs(secs), cancel)
            .await;
        self.remove(&name).await;
        result
    }
}

// ==================== docker_logs ====================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TailArg {
    Count(u64),
    Text(String),
}

impl TailArg {
    fn into_string(self) -> String {
        match self {
            TailArg::Count(n) => n.to_string(),
            TailArg::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogsArgs {
    container: String,
    #[serde(default)]
    tail: Option<TailArg>,
}

/// `docker logs --tail <n> <container>`
pub struct DockerLogsTool {
    sandbox: Arc<PathSandbox>,
    runner: Arc<dyn ProcessRunner>,
}

impl DockerLogsTool {
    pub fn new(sandbox: Arc<PathSandbox>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { sandbox, runner }
    }
}

#[async_trait]
impl Tool for DockerLogsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(DOCKER_LOGS, self.description(), RiskLevel::Low)
            .with_parameter(ToolParameter::new("container", "Container name or id", true))
            .with_parameter(ToolParameter::new(
                "tail",
                "Number of lines, or \"all\" (default: 100)",
                false,
            ))
    }

    fn name(&self) -> &str {
        DOCKER_LOGS
    }

    fn description(&self) -> &str {
        "Get logs from a Docker container"
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let args: LogsArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(DOCKER_LOGS, e),
        };
        let tail = args
            .tail
            .map(TailArg::into_string)
            .unwrap_or_else(|| DEFAULT_LOG_TAIL.to_string());
        if let Err(e) = validate_container_name(&args.container).and_then(|_| validate_tail(&tail)) {
            return ToolResult::failure(DOCKER_LOGS, e.into());
        }

        let argv = vec!["logs".to_string(), "--tail".to_string(), tail, args.container];
        match self.runner.run(DOCKER, &argv, self.sandbox.root(), cancel).await {
            Ok(output) => completed(DOCKER_LOGS, "docker logs", output),
            Err(e) => process_failure(DOCKER_LOGS, e),
        }
    }
}

// ==================== docker_stop ====================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StopArgs {
    container: String,
}

pub struct DockerStopTool {
    sandbox: Arc<PathSandbox>,
    runner: Arc<dyn ProcessRunner>,
}

impl DockerStopTool {
    pub fn new(sandbox: Arc<PathSandbox>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { sandbox, runner }
    }
}

#[async_trait]
impl Tool for DockerStopTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(DOCKER_STOP, self.description(), RiskLevel::High)
            .with_parameter(ToolParameter::new("container", "Container name or id", true))
    }

    fn name(&self) -> &str {
        DOCKER_STOP
    }

    fn description(&self) -> &str {
        "Stop a Docker container"
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let args: StopArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(DOCKER_STOP, e),
        };
        if let Err(e) = validate_container_name(&args.container) {
            return ToolResult::failure(DOCKER_STOP, e.into());
        }

        let argv = vec!["stop".to_string(), args.container];
        match self.runner.run(DOCKER, &argv, self.sandbox.root(), cancel).await {
            Ok(output) => completed(DOCKER_STOP, "docker stop", output),
            Err(e) => process_failure(DOCKER_STOP, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::RecordingRunner;
    use dockerizer_application::ports::process_runner::{ProcessError, ProcessOutput};
    use dockerizer_domain::tool::ToolErrorCode;
    use tempfile::TempDir;

    fn setup(runner: RecordingRunner) -> (TempDir, Arc<PathSandbox>, Arc<RecordingRunner>) {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = Arc::new(PathSandbox::new(dir.path()).unwrap());
        (dir, sandbox, Arc::new(runner))
    }

    fn ok(stdout: &str) -> ProcessOutput {
        ProcessOutput::new(Some(0), stdout, "")
    }

    #[tokio::test]
    async fn test_build_uses_fixed_argv() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new().respond(ok("Successfully built")));
        let tool = DockerBuildTool::new(sandbox.clone(), runner.clone());

        let call = ToolCall::new(DOCKER_BUILD).with_arg("tag", "app:test");
        let result = tool.execute(&call, &CancellationToken::new()).await;

        assert!(result.is_success());
        let runs = runner.runs.lock().unwrap();
        assert_eq!(runs[0].program, "docker");
        assert_eq!(runs[0].args[0], "build");
        assert_eq!(runs[0].args[1], "-f");
        assert!(runs[0].args[2].ends_with("Dockerfile"));
        assert_eq!(&runs[0].args[3..], ["-t", "app:test", "."]);
        assert_eq!(runs[0].cwd, sandbox.root());
    }

    #[tokio::test]
    async fn test_build_failure_keeps_output() {
        let (_dir, sandbox, runner) = setup(
            RecordingRunner::new().respond(ProcessOutput::new(Some(1), "Step 1/3", "\nno such file")),
        );
        let tool = DockerBuildTool::new(sandbox, runner);

        let result = tool
            .execute(&ToolCall::new(DOCKER_BUILD), &CancellationToken::new())
            .await;

        let err = result.error().unwrap();
        assert_eq!(err.code, ToolErrorCode::ExecutionFailed);
        assert_eq!(err.message, "docker build failed: exit status 1");
        assert!(result.output().unwrap().contains("no such file"));
        assert_eq!(result.metadata.exit_code, Some(1));
    }

    #[tokio::test]
    async fn test_build_rejects_escaping_dockerfile() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new());
        let tool = DockerBuildTool::new(sandbox, runner.clone());

        let call = ToolCall::new(DOCKER_BUILD).with_arg("dockerfile", "../Dockerfile");
        let result = tool.execute(&call, &CancellationToken::new()).await;

        assert_eq!(result.error().unwrap().code, ToolErrorCode::PathEscape);
        assert!(runner.runs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_rejects_flag_as_tag() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new());
        let tool = DockerBuildTool::new(sandbox, runner.clone());

        let call = ToolCall::new(DOCKER_BUILD).with_arg("tag", "--privileged");
        let result = tool.execute(&call, &CancellationToken::new()).await;

        assert_eq!(result.error().unwrap().code, ToolErrorCode::InvalidArgument);
        assert!(runner.runs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_argument_is_invalid() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new());
        let tool = DockerRunTool::new(sandbox, runner);

        let call = ToolCall::new(DOCKER_RUN)
            .with_arg("image", "app:test")
            .with_arg("privileged", true);
        let result = tool.execute(&call, &CancellationToken::new()).await;
        assert_eq!(result.error().unwrap().code, ToolErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_run_success_removes_container() {
        let (_dir, sandbox, runner) = setup(
            RecordingRunner::new()
                .respond(ok("abc123\n"))
                .respond(ok("running\n")),
        );
        let tool = DockerRunTool::new(sandbox, runner.clone());

        let call = ToolCall::new(DOCKER_RUN)
            .with_arg("image", "app:test")
            .with_arg("timeout", 0);
        let result = tool.execute(&call, &CancellationToken::new()).await;

        assert!(result.is_success());
        let runs = runner.runs.lock().unwrap();
        assert_eq!(runs.len(), 3);
        let name = runs[0].args[3].clone();
        assert!(name.starts_with("dockerize-test-"));
        assert_eq!(runs[0].args, ["run", "-d", "--name", name.as_str(), "app:test"]);
        assert_eq!(runs[1].args[0], "inspect");
        assert_eq!(runs[2].args, ["rm", "-f", name.as_str()]);
    }

    #[tokio::test]
    async fn test_run_exited_container_reports_logs() {
        let (_dir, sandbox, runner) = setup(
            RecordingRunner::new()
                .respond(ok("abc123\n"))
                .respond(ok("exited\n"))
                .respond(ProcessOutput::new(Some(0), "", "Error: cannot find module 'express'\n")),
        );
        let tool = DockerRunTool::new(sandbox, runner.clone());

        let call = ToolCall::new(DOCKER_RUN)
            .with_arg("image", "app:test")
            .with_arg("timeout", 0);
        let result = tool.execute(&call, &CancellationToken::new()).await;

        let err = result.error().unwrap();
        assert_eq!(err.message, "container exited with status: exited");
        assert!(result.output().unwrap().contains("cannot find module"));

        let argvs = runner.argvs();
        assert_eq!(argvs.len(), 4);
        assert!(argvs[2].starts_with("docker logs dockerize-test-"));
        assert!(argvs[3].starts_with("docker rm -f dockerize-test-"));
    }

    #[tokio::test]
    async fn test_run_start_failure_still_removes() {
        let (_dir, sandbox, runner) = setup(
            RecordingRunner::new().respond(ProcessOutput::new(Some(125), "", "pull access denied")),
        );
        let tool = DockerRunTool::new(sandbox, runner.clone());

        let call = ToolCall::new(DOCKER_RUN).with_arg("image", "missing:latest");
        let result = tool.execute(&call, &CancellationToken::new()).await;

        assert!(result.error().unwrap().message.starts_with("docker run failed"));
        let argvs = runner.argvs();
        assert_eq!(argvs.len(), 2);
        assert!(argvs[1].starts_with("docker rm -f "));
    }

    #[tokio::test]
    async fn test_run_cancelled_during_wait_removes_container() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new().respond(ok("abc123\n")));
        let tool = DockerRunTool::new(sandbox, runner.clone());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let call = ToolCall::new(DOCKER_RUN)
            .with_arg("image", "app:test")
            .with_arg("timeout", 120);
        let result = tool.execute(&call, &cancel).await;

        assert_eq!(result.error().unwrap().code, ToolErrorCode::Cancelled);
        let argvs = runner.argvs();
        assert_eq!(argvs.len(), 2);
        assert!(argvs[1].starts_with("docker rm -f "));
    }

    #[test]
    fn test_container_names_are_unique() {
        let a = test_container_name();
        let b = test_container_name();
        assert_ne!(a, b);
        assert!(validate_container_name(&a).is_ok());
    }

    #[tokio::test]
    async fn test_logs_accepts_numeric_tail() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new().respond(ok("line\n")));
        let tool = DockerLogsTool::new(sandbox, runner.clone());

        let call = ToolCall::new(DOCKER_LOGS)
            .with_arg("container", "web_1")
            .with_arg("tail", 20);
        assert!(tool.execute(&call, &CancellationToken::new()).await.is_success());
        assert_eq!(runner.argvs(), vec!["docker logs --tail 20 web_1"]);
    }

    #[tokio::test]
    async fn test_logs_rejects_bad_tail() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new());
        let tool = DockerLogsTool::new(sandbox, runner.clone());

        let call = ToolCall::new(DOCKER_LOGS)
            .with_arg("container", "web_1")
            .with_arg("tail", "--follow");
        let result = tool.execute(&call, &CancellationToken::new()).await;
        assert_eq!(result.error().unwrap().code, ToolErrorCode::InvalidArgument);
        assert!(runner.runs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stop_maps_cancellation() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new().fail(ProcessError::Cancelled {
            program: "docker".into(),
        }));
        let tool = DockerStopTool::new(sandbox, runner);

        let call = ToolCall::new(DOCKER_STOP).with_arg("container", "web_1");
        let result = tool.execute(&call, &CancellationToken::new()).await;
        assert_eq!(result.error().unwrap().code, ToolErrorCode::Cancelled);
    }

    #[tokio::test]
    async fn test_stop_requires_container() {
        let (_dir, sandbox, runner) = setup(RecordingRunner::new());
        let tool = DockerStopTool::new(sandbox, runner);
        let result = tool
            .execute(&ToolCall::new(DOCKER_STOP), &CancellationToken::new())
            .await;
        assert_eq!(result.error().unwrap().code, ToolErrorCode::InvalidArgument);
    }
}
