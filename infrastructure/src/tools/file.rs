//! File operation tools: file_read, file_write

use crate::sandbox::PathSandbox;
use async_trait::async_trait;
use dockerizer_application::ports::tool::Tool;
use dockerizer_domain::tool::{
    RiskLevel, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult,
    ToolResultMetadata,
};
use serde::Deserialize;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::fs;
use tokio_util::sync::CancellationToken;

/// Tool name constants
pub const FILE_READ: &str = "file_read";
pub const FILE_WRITE: &str = "file_write";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadArgs {
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WriteArgs {
    path: String,
    content: String,
}

pub struct FileReadTool {
    sandbox: Arc<PathSandbox>,
}

impl FileReadTool {
    pub fn new(sandbox: Arc<PathSandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileReadTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(FILE_READ, self.description(), RiskLevel::Low).with_parameter(
            ToolParameter::new("path", "Path relative to the working directory", true)
                .with_type("path"),
        )
    }

    fn name(&self) -> &str {
        FILE_READ
    }

    fn description(&self) -> &str {
        "Read content from a file"
    }

    async fn execute(&self, call: &ToolCall, _cancel: &CancellationToken) -> ToolResult {
        let args: ReadArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(FILE_READ, e),
        };
        let path = match self.sandbox.resolve_for_read(&args.path) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(FILE_READ, e.into()),
        };

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return ToolResult::failure(FILE_READ, ToolError::not_found(&args.path));
            }
            Err(e) => {
                return ToolResult::failure(
                    FILE_READ,
                    ToolError::execution_failed(format!("failed to stat file: {}", e)),
                );
            }
        };
        if !metadata.is_file() {
            return ToolResult::failure(
                FILE_READ,
                ToolError::invalid_argument(format!("'{}' is not a file", args.path)),
            );
        }
        if metadata.len() > MAX_READ_SIZE {
            return ToolResult::failure(
                FILE_READ,
                ToolError::invalid_argument(format!(
                    "file too large ({} bytes, maximum {})",
                    metadata.len(),
                    MAX_READ_SIZE
                )),
            );
        }

        match fs::read_to_string(&path).await {
            Ok(content) => {
                let bytes = content.len();
                ToolResult::success(FILE_READ, content).with_metadata(ToolResultMetadata {
                    bytes: Some(bytes),
                    path: Some(args.path),
                    ..Default::default()
                })
            }
            Err(e) => ToolResult::failure(
                FILE_READ,
                ToolError::execution_failed(format!("failed to read file: {}", e)),
            ),
        }
    }
}

pub struct FileWriteTool {
    sandbox: Arc<PathSandbox>,
}

impl FileWriteTool {
    pub fn new(sandbox: Arc<PathSandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileWriteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(FILE_WRITE, self.description(), RiskLevel::High)
            .with_parameter(
                ToolParameter::new("path", "Path relative to the working directory", true)
                    .with_type("path"),
            )
            .with_parameter(ToolParameter::new("content", "Content to write", true))
    }

    fn name(&self) -> &str {
        FILE_WRITE
    }

    fn description(&self) -> &str {
        "Write content to a file"
    }

    async fn execute(&self, call: &ToolCall, _cancel: &CancellationToken) -> ToolResult {
        let args: WriteArgs = match call.parse_args() {
            Ok(a) => a,
            Err(e) => return ToolResult::failure(FILE_WRITE, e),
        };
        let path = match self.sandbox.resolve(&args.path) {
            Ok(p) => p,
            Err(e) => return ToolResult::failure(FILE_WRITE, e.into()),
        };

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            return ToolResult::failure(
                FILE_WRITE,
                ToolError::execution_failed(format!("failed to create directory: {}", e)),
            );
        }

        let bytes = args.content.len();
        if let Err(e) = fs::write(&path, args.content.as_bytes()).await {
            return ToolResult::failure(
                FILE_WRITE,
                ToolError::execution_failed(format!("failed to write file: {}", e)),
            );
        }

        ToolResult::success(
            FILE_WRITE,
            format!("Written {} bytes to {}", bytes, args.path),
        )
        .with_metadata(ToolResultMetadata {
            bytes: Some(bytes),
            path: Some(args.path),
            ..Default::default()
        })
    }
}
