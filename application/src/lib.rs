//! Application layer for dockerizer
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, MAX_TEST_TIMEOUT_SECS};
pub use ports::{
    config_generator::{ConfigGenerator, GenerationError},
    process_runner::{ProcessError, ProcessOutput, ProcessRunner},
    stack_pipeline::{PipelineError, StackPipeline},
    tool::Tool,
    tool_executor::ToolExecutorPort,
};
pub use use_cases::dispatch_tool::ToolDispatcher;
pub use use_cases::run_agent::{
    AgentEventEmitter, RunAgentError, RunAgentInput, RunAgentUseCase, feedback_instructions,
};
