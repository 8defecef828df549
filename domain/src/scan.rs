//! Workspace scan results handed to the generator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot of a project directory.
///
/// The agent loop treats it as opaque input for the generator; only
/// the stack pipeline looks inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Absolute, canonical project root
    pub root: PathBuf,
    /// Root-relative file paths with `/` separators, sorted
    pub files: Vec<String>,
    /// Manifest files found directly under the root (e.g. `Cargo.toml`)
    pub key_files: Vec<String>,
    /// Whether the file list was cut off at the scan limit
    #[serde(default)]
    pub truncated: bool,
}

impl ScanResult {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn has_file(&self, relative: &str) -> bool {
        self.files.iter().any(|f| f == relative)
    }

    pub fn has_key_file(&self, name: &str) -> bool {
        self.key_files.iter().any(|f| f == name)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// A language suggested by a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackHint {
    pub manifest: String,
    pub language: String,
}

/// Result of the analyze step: the scan plus manifest-based hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackReport {
    pub root: PathBuf,
    pub file_count: usize,
    pub key_files: Vec<String>,
    pub hints: Vec<StackHint>,
}

impl StackReport {
    /// First hinted language, if any manifest was recognised.
    pub fn primary_language(&self) -> Option<&str> {
        self.hints.first().map(|h| h.language.as_str())
    }

    pub fn detected(&self) -> bool {
        !self.hints.is_empty()
    }
}
