//! Project directory scanning.

mod workspace;

pub use workspace::{
    ALLOWED_HIDDEN_FILES, IGNORED_DIRS, KEY_MANIFESTS, ScanError, WorkspaceScanner,
};
