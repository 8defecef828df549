//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatch_tool;
pub mod run_agent;
pub(crate) mod shared;
