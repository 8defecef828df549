//! Infrastructure layer for dockerizer
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the path sandbox, the process runner,
//! the concrete tools, the stack pipeline and configuration loading.

pub mod config;
pub mod generator;
pub mod pipeline;
pub mod process;
pub mod sandbox;
pub mod scanner;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAgentConfig, FileConfig, FileGeneratorConfig, FileInspectorsConfig,
    FileOutputConfig,
};
pub use generator::CommandGenerator;
pub use pipeline::ManifestStackPipeline;
pub use process::{DOCKER, TokioProcessRunner, find_program};
pub use sandbox::{PathSandbox, SandboxError};
pub use scanner::{ScanError, WorkspaceScanner};
pub use tools::default_tools;
