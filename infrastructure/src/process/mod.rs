//! Subprocess execution.

mod runner;

pub use runner::TokioProcessRunner;

use std::path::PathBuf;

/// Container CLI the docker tools invoke.
pub const DOCKER: &str = "docker";

/// Locate `program` on `PATH`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
