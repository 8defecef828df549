//! Stack tools: dockerizer_analyze, dockerizer_generate
//!
//! Thin wrappers over the [`StackPipeline`] port. The target directory is
//! resolved through the sandbox before the pipeline sees it, and the
//! generate tool returns the file contents instead of writing them; writes
//! go through `file_write` and its inspectors.

use crate::sandbox::PathSandbox;
use async_trait::async_trait;
use dockerizer_application::ports::config_generator::GenerationError;
use dockerizer_application::ports::stack_pipeline::{PipelineError, StackPipeline};
use dockerizer_application::ports::tool::Tool;
use dockerizer_domain::tool::{
    RiskLevel, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DOCKERIZER_ANALYZE: &str = "dockerizer_analyze";
pub const DOCKERIZER_GENERATE: &str = "dockerizer_generate";

pub const DEFAULT_GENERATE_INSTRUCTIONS: &str = "Generate a production-ready Docker configuration";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalyzeArgs {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerateArgs {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    instructions: Option<String>,
}

fn pipeline_failure(tool: &str, err: PipelineError) -> ToolResult {
    let error = match err {
        PipelineError::NotDetected => ToolError::not_found(err.to_string()),
        PipelineError::Generation(GenerationError::Cancelled) => ToolError::cancelled(tool),
        other => ToolError::execution_failed(other.to_string()),
    };
    ToolResult::failure(tool, error)
}

fn to_pretty(tool: &str, value: &serde_json::Value) -> ToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => ToolResult::success(tool, text),
        Err(e) => ToolResult::failure(tool, ToolError::execution_failed(e.to_string())),
    }
}

pub struct AnalyzeTool {
    sandbox: Arc<PathSandbox>,
    pipeline: Arc<dyn StackPipeline>,
}

impl AnalyzeTool {
    pub fn new(sandbox: Arc<PathSandbox>, pipeline: Arc<dyn StackPipeline>) -> Self {
        Self { sandbox, pipeline }
    }
}

#[async_trait]
impl Tool for AnalyzeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(DOCKERIZER_ANALYZE, self.description(), RiskLevel::Low).with_parameter(
            ToolParameter::new("path", "Directory to analyze (default: working directory)", false)
                .with_type("path"),
        )
    }

    fn name(&self) -> &str {
        DOCKERIZER_ANALYZE
    }

    fn description(&self) -> &str {
        "Analyze a repository to detect its technology stack"
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let args: AnalyzeArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(DOCKERIZER_ANALYZE, e),
        };
        let path = match self.sandbox.resolve(args.path.as_deref().unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(DOCKERIZER_ANALYZE, e.into()),
        };

        match self.pipeline.analyze(&path, cancel).await {
            Ok(report) => to_pretty(
                DOCKERIZER_ANALYZE,
                &json!({
                    "detected": report.detected(),
                    "language": report.primary_language(),
                    "file_count": report.file_count,
                    "key_files": report.key_files,
                    "hints": report.hints,
                }),
            ),
            Err(e) => pipeline_failure(DOCKERIZER_ANALYZE, e),
        }
    }
}

pub struct GenerateTool {
    sandbox: Arc<PathSandbox>,
    pipeline: Arc<dyn StackPipeline>,
}

impl GenerateTool {
    pub fn new(sandbox: Arc<PathSandbox>, pipeline: Arc<dyn StackPipeline>) -> Self {
        Self { sandbox, pipeline }
    }
}

#[async_trait]
impl Tool for GenerateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(DOCKERIZER_GENERATE, self.description(), RiskLevel::Low)
            .with_parameter(
                ToolParameter::new("path", "Directory to generate for (default: working directory)", false)
                    .with_type("path"),
            )
            .with_parameter(ToolParameter::new(
                "instructions",
                "Extra instructions for the generator",
                false,
            ))
    }

    fn name(&self) -> &str {
        DOCKERIZER_GENERATE
    }

    fn description(&self) -> &str {
        "Generate Docker configuration files for a repository"
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let args: GenerateArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(DOCKERIZER_GENERATE, e),
        };
        let path = match self.sandbox.resolve(args.path.as_deref().unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(DOCKERIZER_GENERATE, e.into()),
        };
        let instructions = args
            .instructions
            .unwrap_or_else(|| DEFAULT_GENERATE_INSTRUCTIONS.to_string());

        match self.pipeline.generate(&path, &instructions, cancel).await {
            Ok(files) => to_pretty(
                DOCKERIZER_GENERATE,
                &json!({
                    "success": true,
                    "files": files.file_names(),
                    "contents": files,
                }),
            ),
            Err(e) => pipeline_failure(DOCKERIZER_GENERATE, e),
        }
    }
}
