//! Tool domain value objects: immutable result and error types
//!
//! Every dispatched call produces a [`ToolResult`]. Failures carry a
//! [`ToolError`] whose [`ToolErrorCode`] tells refusals apart from failures:
//!
//! | Code | Meaning | Side effect happened? |
//! |------|---------|-----------------------|
//! | `PATH_ESCAPE` | path sandbox violation | No |
//! | `DISALLOWED_COMMAND` | command validator rejection | No |
//! | `INSPECTOR_REJECTED` | an inspector refused the call | No |
//! | `INVALID_ARGUMENT` | arguments did not match the tool's shape | No |
//! | `UNKNOWN_TOOL` | no tool registered under that name | No |
//! | `EXECUTION_FAILED` | the external program or API failed | Yes (attempted) |
//! | `NOT_FOUND` | a file or container did not exist | Yes (attempted) |
//! | `CANCELLED` | the run was cancelled mid-call | Maybe |

use serde::{Deserialize, Serialize};

/// Error classification for tool failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorCode {
    PathEscape,
    DisallowedCommand,
    InspectorRejected,
    InvalidArgument,
    UnknownTool,
    ExecutionFailed,
    NotFound,
    Cancelled,
}

impl ToolErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorCode::PathEscape => "PATH_ESCAPE",
            ToolErrorCode::DisallowedCommand => "DISALLOWED_COMMAND",
            ToolErrorCode::InspectorRejected => "INSPECTOR_REJECTED",
            ToolErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorCode::UnknownTool => "UNKNOWN_TOOL",
            ToolErrorCode::ExecutionFailed => "EXECUTION_FAILED",
            ToolErrorCode::NotFound => "NOT_FOUND",
            ToolErrorCode::Cancelled => "CANCELLED",
        }
    }

    /// Whether the call was refused before any side effect was attempted.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            ToolErrorCode::PathEscape
                | ToolErrorCode::DisallowedCommand
                | ToolErrorCode::InspectorRejected
                | ToolErrorCode::InvalidArgument
                | ToolErrorCode::UnknownTool
        )
    }
}

impl std::fmt::Display for ToolErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error that occurred while dispatching or executing a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ToolErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Name of the inspector that refused the call (`INSPECTOR_REJECTED` only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            inspector: None,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn path_escape(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::PathEscape, message)
    }

    pub fn disallowed_command(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::DisallowedCommand, message)
    }

    pub fn inspector_rejected(inspector: impl Into<String>, reason: impl Into<String>) -> Self {
        let inspector = inspector.into();
        Self {
            code: ToolErrorCode::InspectorRejected,
            message: format!("inspector {} rejected tool call: {}", inspector, reason.into()),
            inspector: Some(inspector),
            details: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::InvalidArgument, message)
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new(
            ToolErrorCode::UnknownTool,
            format!("unknown tool: {}", name.into()),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::ExecutionFailed, message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ToolErrorCode::NotFound,
            format!("not found: {}", resource.into()),
        )
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::new(
            ToolErrorCode::Cancelled,
            format!("cancelled: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution.
///
/// A failed result may still carry `output`: whatever stdout/stderr the
/// external program produced before it failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Captured output (also kept for failures, when available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of bytes read or written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// For file operations: the affected path (root-relative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// For subprocesses: exit code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Attach partial output to a failed result
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_exit_code(mut self, exit_code: Option<i32>) -> Self {
        self.metadata.exit_code = exit_code;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Convert into `(output, Result)`, the shape the agent loop consumes.
    pub fn into_parts(self) -> (String, Result<(), ToolError>) {
        let output = self.output.unwrap_or_default();
        match self.error {
            Some(error) if !self.success => (output, Err(error)),
            _ if !self.success => (
                output,
                Err(ToolError::execution_failed(format!(
                    "{} failed without an error",
                    self.tool_name
                ))),
            ),
            _ => (output, Ok(())),
        }
    }
}
