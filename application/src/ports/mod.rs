//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod config_generator;
pub mod process_runner;
pub mod stack_pipeline;
pub mod tool;
pub mod tool_executor;
