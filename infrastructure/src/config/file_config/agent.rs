//! Agent configuration from TOML (`[agent]` section)

use dockerizer_application::config::{ExecutionParams, MAX_TEST_TIMEOUT_SECS};
use dockerizer_domain::config::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_attempts = 5
/// image_tag = "dockerize-test:latest"
/// test_timeout_secs = 30   # capped at 300
/// event_buffer = 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub max_attempts: u32,
    pub image_tag: String,
    pub test_timeout_secs: u64,
    pub event_buffer: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_attempts: params.max_attempts,
            image_tag: params.image_tag,
            test_timeout_secs: params.test_timeout_secs,
            event_buffer: params.event_buffer,
        }
    }
}

impl FileAgentConfig {
    /// Convert into loop parameters, reporting what had to be adjusted.
    pub fn to_execution_params(&self) -> (ExecutionParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if self.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroMaxAttempts,
                "agent.max_attempts must be at least 1",
            ));
        }
        if self.test_timeout_secs > MAX_TEST_TIMEOUT_SECS {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::TestTimeoutAboveCap,
                format!(
                    "agent.test_timeout_secs = {} exceeds the maximum, using {}",
                    self.test_timeout_secs, MAX_TEST_TIMEOUT_SECS
                ),
            ));
        }
        if self.event_buffer == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroEventBuffer,
                "agent.event_buffer = 0, using a buffer of 1",
            ));
        }

        let params = ExecutionParams::default()
            .with_max_attempts(self.max_attempts)
            .with_image_tag(self.image_tag.clone())
            .with_test_timeout_secs(self.test_timeout_secs)
            .with_event_buffer(self.event_buffer.max(1));

        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockerizer_domain::config::Severity;

    #[test]
    fn test_defaults_match_execution_params() {
        let (params, issues) = FileAgentConfig::default().to_execution_params();
        assert_eq!(params, ExecutionParams::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_timeout_is_capped_with_warning() {
        let config = FileAgentConfig {
            test_timeout_secs: 900,
            ..Default::default()
        };
        let (params, issues) = config.to_execution_params();
        assert_eq!(params.test_timeout_secs, MAX_TEST_TIMEOUT_SECS);
        assert_eq!(issues[0].code, ConfigIssueCode::TestTimeoutAboveCap);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_zero_attempts_is_error() {
        let config = FileAgentConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let (_, issues) = config.to_execution_params();
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroMaxAttempts);
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
