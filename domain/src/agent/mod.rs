//! Agent domain module
//!
//! Records produced by the agent loop: the generated [`FileSet`], one
//! [`Attempt`] per iteration, the overall [`RunResult`] and the lifecycle
//! [`AgentEvent`]s emitted for observers.

pub mod entities;
pub mod events;
pub mod file_set;

pub use entities::{AgentPhase, Attempt, RunResult};
pub use events::{AgentEvent, AgentEventType};
pub use file_set::FileSet;
