//! Content inspector: catches unfinished or misspelled generated files.

use super::{Inspector, is_dockerfile_path};
use crate::tool::entities::ToolCall;
use regex::Regex;
use std::sync::LazyLock;

/// Tokens that mark template leftovers in generated content.
pub const PLACEHOLDERS: &[&str] = &["TODO:", "FIXME:", "YOUR_", "<your-", "{{", "}}"];

/// Misspelled keyword and its correction.
pub const KEYWORD_TYPOS: &[(&str, &str)] = &[
    ("FORMO", "FROM"),
    ("COPPY", "COPY"),
    ("EXPOES", "EXPOSE"),
    ("ENTRYPOIT", "ENTRYPOINT"),
    ("WORKIDR", "WORKDIR"),
];

static TYPO_PATTERNS: LazyLock<Vec<(Regex, &'static str, &'static str)>> = LazyLock::new(|| {
    KEYWORD_TYPOS
        .iter()
        .filter_map(|(typo, fix)| {
            Regex::new(&format!(r"(?i)\b{}\b", typo))
                .ok()
                .map(|re| (re, *typo, *fix))
        })
        .collect()
});

#[derive(Debug, Clone, Default)]
pub struct ContentInspector;

impl ContentInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Inspector for ContentInspector {
    fn name(&self) -> &str {
        "content"
    }

    fn inspect(&self, call: &ToolCall) -> Result<(), String> {
        if call.tool_name != "file_write" {
            return Ok(());
        }
        let path = call.get_string("path").unwrap_or_default();
        let content = call.get_string("content").unwrap_or_default();

        if let Some(token) = PLACEHOLDERS.iter().find(|p| content.contains(*p)) {
            return Err(format!(
                "content contains placeholder text: {} in {}",
                token, path
            ));
        }

        if is_dockerfile_path(path) {
            if let Some((_, typo, fix)) = TYPO_PATTERNS.iter().find(|(re, _, _)| re.is_match(content)) {
                return Err(format!("possible typo: {} should be {}", typo, fix));
            }
        }

        Ok(())
    }
}
