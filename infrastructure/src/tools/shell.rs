//! Shell tool: docker/docker-compose command lines under the command policy.
//!
//! The validated argv is executed directly; no shell ever interprets it.

use super::{completed, process_failure};
use crate::sandbox::PathSandbox;
use async_trait::async_trait;
use dockerizer_application::ports::process_runner::ProcessRunner;
use dockerizer_application::ports::tool::Tool;
use dockerizer_domain::tool::{
    CommandPolicy, RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolResult,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const SHELL: &str = "shell";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShellArgs {
    command: String,
}

pub struct ShellTool {
    sandbox: Arc<PathSandbox>,
    policy: CommandPolicy,
    runner: Arc<dyn ProcessRunner>,
}

impl ShellTool {
    pub fn new(sandbox: Arc<PathSandbox>, runner: Arc<dyn ProcessRunner>) -> Self {
        let policy = CommandPolicy::new(sandbox.root());
        Self {
            sandbox,
            policy,
            runner,
        }
    }
}

#[async_trait]
impl Tool for ShellTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(SHELL, self.description(), RiskLevel::High).with_parameter(
            ToolParameter::new("command", "docker or docker-compose command line", true),
        )
    }

    fn name(&self) -> &str {
        SHELL
    }

    fn description(&self) -> &str {
        "Execute a shell command (docker/docker-compose only)"
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let args: ShellArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(SHELL, e),
        };
        let parsed = match self.policy.validate(&args.command) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(SHELL, e.into()),
        };

        debug!(program = %parsed.program, args = ?parsed.args, "Running validated command");
        match self
            .runner
            .run(&parsed.program, &parsed.args, self.sandbox.root(), cancel)
            .await
        {
            Ok(output) => completed(SHELL, "command", output),
            Err(e) => process_failure(SHELL, e),
        }
    }
}
