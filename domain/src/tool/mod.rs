//! Tool domain module
//!
//! Pure definitions for the sandboxed tool runtime: what a tool call looks
//! like, what it returns, and the lexical policies applied before anything
//! touches the host.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (output)     │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`]: definitions of the registered tools, for listing
//! - [`ToolDefinition`]: schema for a single tool (name, params, risk level)
//! - [`ToolCall`]: an invocation request with an untyped argument bag;
//!   tools decode it with [`ToolCall::parse_args`]
//! - [`ToolResult`] / [`ToolError`]: execution outcome, refusals included
//! - [`CommandPolicy`]: allowlist and argument policy for the `shell` tool
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`Tool`, `ToolExecutorPort`, `ToolDispatcher`): the
//!   execution seam and the inspector gate
//! - **Infrastructure**: concrete tools, the path sandbox and the process runner

pub mod command_policy;
pub mod entities;
pub mod names;
pub mod value_objects;

pub use command_policy::{CommandPolicy, DisallowedCommand, ParsedCommand};
pub use entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolErrorCode, ToolResult, ToolResultMetadata};
