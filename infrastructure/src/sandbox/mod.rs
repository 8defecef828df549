//! Path confinement for filesystem tools.

mod path_sandbox;

pub use path_sandbox::{PathSandbox, SandboxError};
