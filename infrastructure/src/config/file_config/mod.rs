//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agent;
mod generator;
mod inspectors;
mod output;

pub use agent::FileAgentConfig;
pub use generator::FileGeneratorConfig;
pub use inspectors::FileInspectorsConfig;
pub use output::FileOutputConfig;

use dockerizer_domain::config::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent loop settings
    pub agent: FileAgentConfig,
    /// Optional inspectors
    pub inspectors: FileInspectorsConfig,
    /// External generator program
    pub generator: FileGeneratorConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.agent.to_execution_params().1;
        issues.extend(self.inspectors.validate(self.agent.max_attempts));
        issues
    }

    /// [`validate`](Self::validate) plus the checks that only matter when
    /// the agent loop is about to run.
    pub fn validate_for_agent(&self) -> Vec<ConfigIssue> {
        let mut issues = self.validate();
        if self.generator.command().is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingGeneratorCommand,
                "generator.command is not set (use [generator] command = \"...\" or --generator)",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockerizer_domain::OutputFormat;
    use dockerizer_domain::config::has_errors;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[agent]
max_attempts = 3
image_tag = "myapp-test:ci"
test_timeout_secs = 45

[inspectors]
repetition = true
repetition_threshold = 4
content = false

[generator]
command = "dockerizer-ai"
args = ["--model", "fast"]

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.max_attempts, 3);
        assert_eq!(config.agent.image_tag, "myapp-test:ci");
        assert_eq!(config.agent.test_timeout_secs, 45);
        assert_eq!(config.inspectors.repetition_threshold(), Some(4));
        assert!(!config.inspectors.content);
        assert_eq!(config.generator.command(), Some("dockerizer-ai"));
        assert_eq!(config.generator.args, vec!["--model", "fast"]);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.validate_for_agent().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[agent]\nmax_attempts = 2\n").unwrap();
        assert_eq!(config.agent.max_attempts, 2);
        assert_eq!(config.agent.image_tag, "dockerize-test:latest");
        assert!(!config.inspectors.repetition);
        assert!(config.inspectors.content);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_agent_requires_generator() {
        let issues = FileConfig::default().validate_for_agent();
        assert!(has_errors(&issues));
        assert_eq!(issues[0].code, ConfigIssueCode::MissingGeneratorCommand);
    }
}
