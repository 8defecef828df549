//! Stack pipeline port
//!
//! Backs the `dockerizer_analyze` and `dockerizer_generate` tools. Paths are
//! already resolved inside the sandbox root when they get here.

use super::config_generator::GenerationError;
use async_trait::async_trait;
use dockerizer_domain::{FileSet, StackReport};
use std::path::Path;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("scan failed: {0}")]
    Scan(String),

    #[error("could not detect project stack")]
    NotDetected,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[async_trait]
pub trait StackPipeline: Send + Sync {
    async fn analyze(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<StackReport, PipelineError>;

    async fn generate(
        &self,
        path: &Path,
        instructions: &str,
        cancel: &CancellationToken,
    ) -> Result<FileSet, PipelineError>;
}
