//! Output format value object

use serde::{Deserialize, Serialize};

/// How a run result is rendered for the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary with per-attempt details (default)
    #[default]
    Text,
    /// The full run result as JSON
    Json,
}
