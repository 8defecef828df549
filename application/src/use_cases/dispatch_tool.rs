//! Tool dispatcher: the single chokepoint between a proposed call and a tool.
//!
//! ```text
//! ToolCall ──▶ lookup ──▶ InspectorPipeline ──▶ Tool::execute ──▶ ToolResult
//!               │               │
//!               └ UNKNOWN_TOOL  └ INSPECTOR_REJECTED (tool never runs)
//! ```

use crate::ports::tool::Tool;
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use dockerizer_domain::inspector::InspectorPipeline;
use dockerizer_domain::tool::{
    entities::{ToolCall, ToolSpec},
    value_objects::{ToolError, ToolResult},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Registry of tools gated by an inspector pipeline.
pub struct ToolDispatcher {
    tools: HashMap<String, Arc<dyn Tool>>,
    spec: ToolSpec,
    inspectors: InspectorPipeline,
}

impl ToolDispatcher {
    pub fn new(inspectors: InspectorPipeline) -> Self {
        Self {
            tools: HashMap::new(),
            spec: ToolSpec::new(),
            inspectors,
        }
    }

    /// Register a tool; a later registration with the same name replaces it.
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        let definition = tool.definition();
        self.spec = std::mem::take(&mut self.spec).register(definition);
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn register_all(self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        tools.into_iter().fold(self, |dispatcher, tool| dispatcher.register(tool))
    }

    pub fn inspectors(&self) -> &InspectorPipeline {
        &self.inspectors
    }
}

#[async_trait]
impl ToolExecutorPort for ToolDispatcher {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let Some(tool) = self.tools.get(&call.tool_name) else {
            warn!(tool = %call.tool_name, "Unknown tool requested");
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name));
        };

        if let Err(rejection) = self.inspectors.inspect(call) {
            warn!(
                inspector = %rejection.inspector,
                tool = %call.tool_name,
                reason = %rejection.reason,
                "Inspector rejected tool call"
            );
            return ToolResult::failure(&call.tool_name, rejection.into());
        }

        if cancel.is_cancelled() {
            return ToolResult::failure(&call.tool_name, ToolError::cancelled(&call.tool_name));
        }

        debug!(tool = %call.tool_name, "Executing tool");
        let started = Instant::now();
        let result = tool.execute(call, cancel).await;
        let elapsed = started.elapsed().as_millis() as u64;

        match result.error() {
            None => debug!(tool = %call.tool_name, duration_ms = elapsed, "Tool succeeded"),
            Some(err) => info!(
                tool = %call.tool_name,
                code = %err.code,
                duration_ms = elapsed,
                "Tool execution failed: {}",
                err.message
            ),
        }

        if result.metadata.duration_ms.is_none() {
            result.with_duration(elapsed)
        } else {
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockerizer_domain::agent::FileSet;
    use dockerizer_domain::tool::entities::{RiskLevel, ToolDefinition};
    use dockerizer_domain::tool::value_objects::ToolErrorCode;
    use std::sync::Mutex;

    /// Tool that records every call it receives
    struct SpyTool {
        name: &'static str,
        calls: Mutex<Vec<ToolCall>>,
    }

    impl SpyTool {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Tool for SpyTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name, "spy", RiskLevel::High)
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "spy"
        }

        async fn execute(&self, call: &ToolCall, _cancel: &CancellationToken) -> ToolResult {
            self.calls.lock().unwrap().push(call.clone());
            ToolResult::success(self.name, "ok")
        }
    }

    fn dispatcher_with(spy: Arc<SpyTool>, inspectors: InspectorPipeline) -> ToolDispatcher {
        ToolDispatcher::new(inspectors).register(spy)
    }

    #[tokio::test]
    async fn test_from_less_dockerfile_never_reaches_tool() {
        let spy = SpyTool::new("file_write");
        let dispatcher = dispatcher_with(spy.clone(), InspectorPipeline::standard(None, true));

        let call = ToolCall::new("file_write")
            .with_arg("path", "Dockerfile")
            .with_arg("content", "RUN echo no base image\n");
        let result = dispatcher.execute(&call, &CancellationToken::new()).await;

        assert!(!result.is_success());
        let err = result.error().unwrap();
        assert_eq!(err.code, ToolErrorCode::InspectorRejected);
        assert_eq!(err.inspector.as_deref(), Some("syntax"));
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test]
    async fn test_approved_call_reaches_tool() {
        let spy = SpyTool::new("file_write");
        let dispatcher = dispatcher_with(spy.clone(), InspectorPipeline::standard(None, true));

        let call = ToolCall::new("file_write")
            .with_arg("path", "Dockerfile")
            .with_arg("content", "FROM alpine:3.20\n");
        let result = dispatcher.execute(&call, &CancellationToken::new()).await;

        assert!(result.is_success());
        assert!(result.metadata.duration_ms.is_some());
        assert_eq!(spy.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let dispatcher = ToolDispatcher::new(InspectorPipeline::new());
        let result = dispatcher
            .execute(&ToolCall::new("rm"), &CancellationToken::new())
            .await;
        assert_eq!(result.error().unwrap().code, ToolErrorCode::UnknownTool);
    }

    #[tokio::test]
    async fn test_repetition_refuses_fourth_identical_call() {
        let spy = SpyTool::new("docker_build");
        let dispatcher = dispatcher_with(spy.clone(), InspectorPipeline::standard(Some(3), false));
        let call = ToolCall::new("docker_build")
            .with_arg("dockerfile", "Dockerfile")
            .with_arg("tag", "app:test");
        let cancel = CancellationToken::new();

        for _ in 0..3 {
            assert!(dispatcher.execute(&call, &cancel).await.is_success());
        }
        let fourth = dispatcher.execute(&call, &cancel).await;

        let err = fourth.error().unwrap();
        assert_eq!(err.code, ToolErrorCode::InspectorRejected);
        assert_eq!(err.inspector.as_deref(), Some("repetition"));
        assert_eq!(spy.call_count(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_tool() {
        let spy = SpyTool::new("shell");
        let dispatcher = dispatcher_with(spy.clone(), InspectorPipeline::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = dispatcher
            .execute(&ToolCall::new("shell").with_arg("command", "docker ps"), &cancel)
            .await;
        assert_eq!(result.error().unwrap().code, ToolErrorCode::Cancelled);
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test]
    async fn test_write_file_set_goes_through_inspectors() {
        let spy = SpyTool::new("file_write");
        let dispatcher = dispatcher_with(spy.clone(), InspectorPipeline::standard(None, true));

        let files = FileSet::new("FROM node:20\nCMD [\"node\", \"index.js\"]\n")
            .with_dockerignore("node_modules\n");
        dispatcher
            .write_file_set(&files, &CancellationToken::new())
            .await
            .unwrap();

        let calls = spy.calls.lock().unwrap();
        let paths: Vec<_> = calls.iter().map(|c| c.get_string("path").unwrap()).collect();
        assert_eq!(paths, vec!["Dockerfile", ".dockerignore"]);
    }

    #[tokio::test]
    async fn test_write_file_set_stops_at_rejected_file() {
        let spy = SpyTool::new("file_write");
        let dispatcher = dispatcher_with(spy.clone(), InspectorPipeline::standard(None, true));

        let files = FileSet::new("FROM alpine\n").with_env_example("API_KEY=YOUR_KEY\n");
        let err = dispatcher
            .write_file_set(&files, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.code, ToolErrorCode::InspectorRejected);
        assert!(err.message.starts_with(".env.example: "));
        assert_eq!(spy.call_count(), 1);
    }

    #[test]
    fn test_registration_populates_spec() {
        let dispatcher = ToolDispatcher::new(InspectorPipeline::new())
            .register_all([
                SpyTool::new("a") as Arc<dyn Tool>,
                SpyTool::new("b") as Arc<dyn Tool>,
            ]);
        assert!(dispatcher.has_tool("a"));
        assert!(dispatcher.has_tool("b"));
        assert_eq!(dispatcher.tool_spec().len(), 2);
    }
}
