//! Configuration validation issues.
//!
//! Loaders return these instead of failing on the first problem, so the CLI
//! can print every warning and refuse to start only on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `agent.max_attempts = 0`: the loop would never generate anything.
    ZeroMaxAttempts,
    /// `inspectors.repetition_threshold = 0` with the repetition inspector on.
    ZeroRepetitionThreshold,
    /// Repetition threshold below `max_attempts`: later attempts' build and
    /// run calls will be refused as repeats.
    RepetitionBelowAttempts,
    /// No `generator.command` configured for the agent.
    MissingGeneratorCommand,
    /// `agent.test_timeout_secs` above the cap; the cap is used instead.
    TestTimeoutAboveCap,
    /// `agent.event_buffer = 0`: progress events would all be dropped.
    ZeroEventBuffer,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity.as_str(), self.message)
    }
}

/// Check whether any issues are errors (i.e. fatal).
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let warning = ConfigIssue::warning(ConfigIssueCode::TestTimeoutAboveCap, "capped");
        let error = ConfigIssue::error(ConfigIssueCode::ZeroMaxAttempts, "zero");
        assert!(!has_errors(std::slice::from_ref(&warning)));
        assert!(has_errors(&[warning, error]));
        assert!(!has_errors(&[]));
    }

    #[test]
    fn test_display() {
        let issue = ConfigIssue::error(ConfigIssueCode::MissingGeneratorCommand, "no generator");
        assert_eq!(issue.to_string(), "error: no generator");
    }
}
