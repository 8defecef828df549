//! Presentation layer for dockerizer
//!
//! This crate contains CLI definitions, output formatters
//! and the progress reporter fed by agent events.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{AgentArgs, Cli, Command};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::ProgressReporter;
