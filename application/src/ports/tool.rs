//! Tool port
//!
//! A [`Tool`] is one side-effecting capability (write a file, build an
//! image). Tools are registered once with the
//! [`ToolDispatcher`](crate::use_cases::dispatch_tool::ToolDispatcher), which
//! is the only caller of [`Tool::execute`]; tools never see inspectors.

use async_trait::async_trait;
use dockerizer_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    value_objects::ToolResult,
};
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema used for registration and listing
    fn definition(&self) -> ToolDefinition;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Decode `call.arguments` into the tool's own argument type, then act.
    ///
    /// Failures are returned as failed results, never as panics.
    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult;
}
