//! Filesystem confinement for tool paths.
//!
//! Every relative path a tool receives is resolved here before anything
//! touches the disk. The root is canonicalized once; symlinks are resolved
//! with `fs::canonicalize`, so an in-root link pointing outside is caught.

use dockerizer_domain::tool::ToolError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SandboxError {
    #[error("absolute paths are not allowed: {0}")]
    Absolute(String),

    #[error("path escapes working directory: {0}")]
    Escape(String),

    #[error("symlinks are not allowed: {0}")]
    Symlink(String),

    #[error("failed to resolve sandbox root {path}: {message}")]
    Root { path: PathBuf, message: String },
}

impl From<SandboxError> for ToolError {
    fn from(err: SandboxError) -> Self {
        match err {
            SandboxError::Root { .. } => ToolError::execution_failed(err.to_string()),
            other => ToolError::path_escape(other.to_string()),
        }
    }
}

/// Resolver of relative paths confined to one directory.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    /// The root must exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root).map_err(|e| SandboxError::Root {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self { root: canonical })
    }

    /// Canonical sandbox root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` under the root, for writing or inspection.
    ///
    /// The target need not exist; its nearest existing ancestor must then
    /// resolve inside the root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, SandboxError> {
        let cleaned = lexical_clean(relative)?;
        if cleaned.as_os_str().is_empty() {
            return Ok(self.root.clone());
        }
        let full = self.root.join(&cleaned);

        match fs::canonicalize(&full) {
            Ok(real) => {
                self.ensure_within(&real, relative)?;
            }
            Err(_) => {
                // A dangling symlink leaf would let a write land anywhere
                if is_symlink(&full) {
                    return Err(SandboxError::Escape(relative.to_string()));
                }
                let ancestor = full
                    .ancestors()
                    .skip(1)
                    .find_map(|a| fs::canonicalize(a).ok())
                    .ok_or_else(|| SandboxError::Escape(relative.to_string()))?;
                self.ensure_within(&ancestor, relative)?;
            }
        }

        Ok(full)
    }

    /// [`resolve`](Self::resolve), additionally refusing a leaf that is itself a symlink.
    pub fn resolve_for_read(&self, relative: &str) -> Result<PathBuf, SandboxError> {
        let path = self.resolve(relative)?;
        if is_symlink(&path) {
            return Err(SandboxError::Symlink(relative.to_string()));
        }
        Ok(path)
    }

    fn ensure_within(&self, real: &Path, relative: &str) -> Result<(), SandboxError> {
        if real.starts_with(&self.root) {
            Ok(())
        } else {
            Err(SandboxError::Escape(relative.to_string()))
        }
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Normalize `.` and `..` without touching the filesystem.
fn lexical_clean(relative: &str) -> Result<PathBuf, SandboxError> {
    let path = Path::new(relative);
    if path.is_absolute() || path.has_root() {
        return Err(SandboxError::Absolute(relative.to_string()));
    }

    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    return Err(SandboxError::Escape(relative.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(SandboxError::Absolute(relative.to_string()));
            }
        }
    }
    Ok(cleaned)
}
