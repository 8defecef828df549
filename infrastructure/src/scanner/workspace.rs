//! Workspace scanner
//!
//! Walks the project directory into a [`ScanResult`]: a sorted list of
//! root-relative files plus the manifest files present at the top level.
//! Hidden entries and dependency/build directories are skipped.

use dockerizer_domain::ScanResult;
use glob::{MatchOptions, Pattern};
use std::collections::VecDeque;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;
use tracing::{debug, trace};

/// Directory names never descended into.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "__pycache__",
    "venv",
    "dist",
    "build",
    "target",
];

/// Hidden files that still matter for stack detection.
pub const ALLOWED_HIDDEN_FILES: &[&str] = &[
    ".nvmrc",
    ".node-version",
    ".python-version",
    ".ruby-version",
    ".go-version",
    ".java-version",
    ".tool-versions",
    ".env.example",
    ".dockerignore",
    ".gitignore",
];

/// Top-level files reported as key files.
pub const KEY_MANIFESTS: &[&str] = &[
    "Cargo.toml",
    "package.json",
    "go.mod",
    "requirements.txt",
    "pyproject.toml",
    "Pipfile",
    "Gemfile",
    "composer.json",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "mix.exs",
    "Dockerfile",
    "docker-compose.yml",
];

const DEFAULT_MAX_FILES: usize = 10_000;
const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("invalid scan pattern: {0}")]
    Pattern(String),
}

fn is_key_manifest(name: &str) -> bool {
    KEY_MANIFESTS.contains(&name) || name.ends_with(".csproj")
}

#[derive(Debug, Clone)]
pub struct WorkspaceScanner {
    max_files: usize,
    max_depth: usize,
}

impl Default for WorkspaceScanner {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl WorkspaceScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        let root = fs::canonicalize(root)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| ScanError::NotADirectory(root.display().to_string()))?;

        let mut result = ScanResult::new(&root);
        let dirs = self.collect(&root, &mut result)?;

        for name in ALLOWED_HIDDEN_FILES {
            if root.join(name).is_file() {
                result.files.push((*name).to_string());
            }
        }

        result.files.sort();
        result.files.dedup();
        result.key_files = result
            .files
            .iter()
            .filter(|f| !f.contains('/') && is_key_manifest(f))
            .cloned()
            .collect();

        debug!(
            root = %root.display(),
            files = result.files.len(),
            key_files = ?result.key_files,
            truncated = result.truncated,
            dirs,
            "Workspace scanned"
        );
        Ok(result)
    }

    /// Breadth-first walk, one glob level per directory. Hidden, ignored
    /// and too-deep directories are never read. Returns the number of
    /// directories read.
    fn collect(&self, root: &Path, result: &mut ScanResult) -> Result<usize, ScanError> {
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let mut pending = VecDeque::from([(root.to_path_buf(), 1usize)]);
        let mut dirs = 0;

        while let Some((dir, depth)) = pending.pop_front() {
            dirs += 1;
            let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
            let entries = glob::glob_with(&pattern, options)
                .map_err(|e| ScanError::Pattern(e.to_string()))?;

            for entry in entries.flatten() {
                let Ok(meta) = fs::symlink_metadata(&entry) else {
                    continue;
                };
                if meta.is_dir() {
                    let name = entry.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                    if IGNORED_DIRS.contains(&name) {
                        trace!(path = %entry.display(), "Skipping: ignored directory");
                    } else if depth >= self.max_depth {
                        trace!(path = %entry.display(), "Skipping: too deep");
                    } else {
                        pending.push_back((entry, depth + 1));
                    }
                    continue;
                }
                if !entry.is_file() {
                    continue;
                }
                let Ok(relative) = entry.strip_prefix(root) else {
                    continue;
                };
                if result.files.len() >= self.max_files {
                    result.truncated = true;
                    return Ok(dirs);
                }
                result.files.push(to_slash(relative));
            }
        }
        Ok(dirs)
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
