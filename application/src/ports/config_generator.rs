//! Config generator port
//!
//! The AI collaborator that turns a scan plus instructions into a
//! [`FileSet`]. The agent loop does not interpret the content; inspectors
//! check it when it is written.

use async_trait::async_trait;
use dockerizer_domain::{FileSet, ScanResult};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation failed: {0}")]
    Failed(String),

    #[error("invalid generator response: {0}")]
    InvalidResponse(String),

    #[error("generator returned no Dockerfile")]
    EmptyResponse,

    #[error("generation cancelled")]
    Cancelled,
}

#[async_trait]
pub trait ConfigGenerator: Send + Sync {
    async fn generate(
        &self,
        scan: &ScanResult,
        instructions: &str,
        cancel: &CancellationToken,
    ) -> Result<FileSet, GenerationError>;
}
