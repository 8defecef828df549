//! Adapters for the AI configuration generator.

mod command;

pub use command::{CommandGenerator, parse_response};
