//! Application-level configuration.
//!
//! - [`ExecutionParams`]: agent loop control (attempts, image tag, timeouts)

pub mod execution_params;

pub use execution_params::{ExecutionParams, MAX_TEST_TIMEOUT_SECS};
