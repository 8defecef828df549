//! Security inspector

use super::Inspector;
use crate::tool::entities::ToolCall;

/// Shell substrings that are never acceptable, whatever the command validator
/// would have said about them.
pub const DANGEROUS_SUBSTRINGS: &[&str] = &[
    "rm -rf /",
    "rm -rf /*",
    "dd if=",
    "mkfs",
    ":(){ :|:& };:",
    "> /dev/sd",
    "chmod -R 777 /",
];

#[derive(Debug, Clone, Default)]
pub struct SecurityInspector;

impl SecurityInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Inspector for SecurityInspector {
    fn name(&self) -> &str {
        "security"
    }

    fn inspect(&self, call: &ToolCall) -> Result<(), String> {
        match call.tool_name.as_str() {
            "shell" => {
                let command = call.get_string("command").unwrap_or_default();
                if let Some(pattern) = DANGEROUS_SUBSTRINGS.iter().find(|p| command.contains(*p)) {
                    return Err(format!("blocked dangerous command: {}", pattern));
                }
            }
            "docker_run" => {
                if call.get_bool("privileged") == Some(true) {
                    return Err("privileged containers are not allowed".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_catastrophic_shell() {
        let inspector = SecurityInspector::new();
        for command in [
            "rm -rf /",
            "sudo rm -rf /*",
            "dd if=/dev/zero of=/dev/sda",
            "mkfs.ext4 /dev/sda1",
            ":(){ :|:& };:",
            "cat x > /dev/sda",
            "chmod -R 777 /",
        ] {
            let call = ToolCall::new("shell").with_arg("command", command);
            assert!(inspector.inspect(&call).is_err(), "allowed {:?}", command);
        }
    }

    #[test]
    fn test_allows_ordinary_shell() {
        let call = ToolCall::new("shell").with_arg("command", "docker ps -a");
        assert!(SecurityInspector::new().inspect(&call).is_ok());
    }

    #[test]
    fn test_rejects_privileged_run() {
        let inspector = SecurityInspector::new();
        let call = ToolCall::new("docker_run")
            .with_arg("image", "app:test")
            .with_arg("privileged", true);
        assert_eq!(
            inspector.inspect(&call),
            Err("privileged containers are not allowed".to_string())
        );

        let call = ToolCall::new("docker_run")
            .with_arg("image", "app:test")
            .with_arg("privileged", false);
        assert!(inspector.inspect(&call).is_ok());
    }

    #[test]
    fn test_ignores_other_tools() {
        let call = ToolCall::new("file_write")
            .with_arg("path", "notes.txt")
            .with_arg("content", "rm -rf /");
        assert!(SecurityInspector::new().inspect(&call).is_ok());
    }
}
