//! Process runner port
//!
//! Narrow seam over subprocess execution so tools and the command generator
//! can be tested against a fake runner.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new(status: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }

    pub fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} failed: {message}")]
    Io { program: String, message: String },

    #[error("{program} was cancelled")]
    Cancelled { program: String },
}

impl ProcessError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProcessError::Cancelled { .. })
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` in `cwd`, feeding `input` to stdin when given.
    ///
    /// A non-zero exit is not an error; callers inspect
    /// [`ProcessOutput::status`]. Cancellation stops waiting and returns
    /// [`ProcessError::Cancelled`].
    async fn run_with_input(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError>;

    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        self.run_with_input(program, args, cwd, None, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_keeps_order() {
        let output = ProcessOutput::new(Some(1), "Step 1/3\n", "error: missing\n");
        assert_eq!(output.combined(), "Step 1/3\nerror: missing\n");
        assert!(!output.success());
        assert_eq!(output.status_text(), "exit status 1");
    }

    #[test]
    fn test_signal_status() {
        let output = ProcessOutput::new(None, "", "");
        assert!(!output.success());
        assert_eq!(output.status_text(), "terminated by signal");
    }
}
