//! Tool Executor port
//!
//! Defines the interface through which use cases execute tools.

use async_trait::async_trait;
use dockerizer_domain::agent::FileSet;
use dockerizer_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::{ToolError, ToolResult},
};
use tokio_util::sync::CancellationToken;

/// Port for tool execution
///
/// Implemented by the
/// [`ToolDispatcher`](crate::use_cases::dispatch_tool::ToolDispatcher); tests
/// may substitute their own executor.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call asynchronously
    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult;

    /// Write every non-empty entry of `files` as an ordinary `file_write` call.
    ///
    /// Stops at the first failure. The returned error names the file.
    async fn write_file_set(
        &self,
        files: &FileSet,
        cancel: &CancellationToken,
    ) -> Result<(), ToolError> {
        for (name, content) in files.non_empty() {
            let call = ToolCall::new("file_write")
                .with_arg("path", name)
                .with_arg("content", content);
            let (_, outcome) = self.execute(&call, cancel).await.into_parts();
            if let Err(mut err) = outcome {
                err.message = format!("{}: {}", name, err.message);
                return Err(err);
            }
        }
        Ok(())
    }
}
