//! Domain layer for dockerizer
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool calls
//!
//! Every action the agent takes on the host is a [`ToolCall`] that produces a
//! [`ToolResult`]. Refusals (sandbox, command policy, inspectors) are
//! ordinary failed results with a distinct [`ToolErrorCode`].
//!
//! ## Inspectors
//!
//! [`Inspector`]s are pure predicates that gate a call before it runs:
//! security, Dockerfile syntax, repetition and content checks.
//!
//! ## Attempts
//!
//! The agent loop records one [`Attempt`] per generate/write/build/test
//! iteration; a [`RunResult`] carries the whole history.

pub mod agent;
pub mod config;
pub mod core;
pub mod dockerfile;
pub mod inspector;
pub mod scan;
pub mod tool;

// Re-export commonly used types
pub use agent::{AgentEvent, AgentEventType, AgentPhase, Attempt, FileSet, RunResult};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use dockerfile::{DockerfileError, validate_dockerfile};
pub use inspector::{
    ContentInspector, Inspector, InspectorPipeline, InspectorRejection, RepetitionInspector,
    SecurityInspector, SyntaxInspector,
};
pub use scan::{ScanResult, StackHint, StackReport};
pub use tool::{
    CommandPolicy, DisallowedCommand, ParsedCommand, RiskLevel, ToolCall, ToolDefinition,
    ToolError, ToolErrorCode, ToolParameter, ToolResult, ToolResultMetadata, ToolSpec,
};
