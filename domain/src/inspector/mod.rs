//! Inspectors: pre-execution predicates over tool calls.
//!
//! The dispatcher runs every registered [`Inspector`] in order before a tool
//! executes; the first rejection wins and the tool is never invoked.
//!
//! | Inspector | Looks at | Rejects |
//! |-----------|----------|---------|
//! | [`SecurityInspector`] | `shell`, `docker_run` | catastrophic commands, privileged containers |
//! | [`SyntaxInspector`] | `file_write` of a Dockerfile | content that fails the instruction grammar |
//! | [`RepetitionInspector`] | every call | the same call recurring past a threshold |
//! | [`ContentInspector`] | `file_write` | placeholder tokens, keyword typos |
//!
//! Inspectors never perform the side effect they inspect. The repetition
//! inspector keeps its own bounded history, so separate pipelines never share
//! state.

pub mod content;
pub mod pipeline;
pub mod repetition;
pub mod security;
pub mod syntax;

pub use content::ContentInspector;
pub use pipeline::{InspectorPipeline, InspectorRejection};
pub use repetition::RepetitionInspector;
pub use security::SecurityInspector;
pub use syntax::SyntaxInspector;

use crate::tool::entities::ToolCall;

/// A named predicate over a proposed tool call.
pub trait Inspector: Send + Sync {
    /// Short name reported in rejections (e.g. "security")
    fn name(&self) -> &str;

    /// `Err(reason)` refuses the call.
    fn inspect(&self, call: &ToolCall) -> Result<(), String>;
}

/// Whether `path` names a Dockerfile (`Dockerfile` or `*/Dockerfile`).
pub fn is_dockerfile_path(path: &str) -> bool {
    path == "Dockerfile" || path.ends_with("/Dockerfile")
}
