//! Syntax inspector: runs the Dockerfile grammar over Dockerfile writes.

use super::{Inspector, is_dockerfile_path};
use crate::dockerfile::validate_dockerfile;
use crate::tool::entities::ToolCall;

#[derive(Debug, Clone, Default)]
pub struct SyntaxInspector;

impl SyntaxInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Inspector for SyntaxInspector {
    fn name(&self) -> &str {
        "syntax"
    }

    fn inspect(&self, call: &ToolCall) -> Result<(), String> {
        if call.tool_name != "file_write" {
            return Ok(());
        }
        let path = call.get_string("path").unwrap_or_default();
        if !is_dockerfile_path(path) {
            return Ok(());
        }
        let content = call.get_string("content").unwrap_or_default();
        validate_dockerfile(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &str, content: &str) -> ToolCall {
        ToolCall::new("file_write")
            .with_arg("path", path)
            .with_arg("content", content)
    }

    #[test]
    fn test_rejects_dockerfile_without_from() {
        let err = SyntaxInspector::new()
            .inspect(&write("Dockerfile", "RUN echo hi\n"))
            .unwrap_err();
        assert!(err.contains("FROM"));
    }

    #[test]
    fn test_nested_dockerfile_is_checked() {
        assert!(SyntaxInspector::new()
            .inspect(&write("services/api/Dockerfile", "BOGUS\n"))
            .is_err());
    }

    #[test]
    fn test_other_files_are_not_parsed() {
        let inspector = SyntaxInspector::new();
        assert!(inspector.inspect(&write("README.md", "no from here")).is_ok());
        assert!(inspector.inspect(&write("Dockerfile.dev", "junk")).is_ok());
    }

    #[test]
    fn test_valid_dockerfile_passes() {
        assert!(SyntaxInspector::new()
            .inspect(&write("Dockerfile", "FROM alpine\nCMD [\"true\"]\n"))
            .is_ok());
    }
}
