//! Generator configuration from TOML (`[generator]` section)

use serde::{Deserialize, Serialize};

/// External program that produces the Docker configuration.
///
/// ```toml
/// [generator]
/// command = "dockerizer-ai"
/// args = ["--provider", "anthropic"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeneratorConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl FileGeneratorConfig {
    /// Configured command, ignoring blank values
    pub fn command(&self) -> Option<&str> {
        self.command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
