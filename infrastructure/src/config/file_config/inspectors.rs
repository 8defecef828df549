//! Inspector configuration from TOML (`[inspectors]` section)
//!
//! Security and syntax inspectors are always installed and have no switch.

use dockerizer_domain::config::{ConfigIssue, ConfigIssueCode};
use dockerizer_domain::inspector::{InspectorPipeline, repetition::DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};

/// ```toml
/// [inspectors]
/// repetition = false
/// repetition_threshold = 3
/// content = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInspectorsConfig {
    /// Refuse a call once it has been made `repetition_threshold` times
    pub repetition: bool,
    pub repetition_threshold: usize,
    /// Placeholder and keyword-typo checks on written files
    pub content: bool,
}

impl Default for FileInspectorsConfig {
    fn default() -> Self {
        Self {
            repetition: false,
            repetition_threshold: DEFAULT_THRESHOLD,
            content: true,
        }
    }
}

impl FileInspectorsConfig {
    /// Threshold handed to the pipeline, `None` when repetition is off.
    pub fn repetition_threshold(&self) -> Option<usize> {
        self.repetition.then_some(self.repetition_threshold)
    }

    pub fn to_pipeline(&self) -> InspectorPipeline {
        InspectorPipeline::standard(self.repetition_threshold(), self.content)
    }

    pub fn validate(&self, max_attempts: u32) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !self.repetition {
            return issues;
        }
        if self.repetition_threshold == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRepetitionThreshold,
                "inspectors.repetition_threshold must be at least 1",
            ));
        } else if self.repetition_threshold < max_attempts as usize {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::RepetitionBelowAttempts,
                format!(
                    "inspectors.repetition_threshold = {} is below agent.max_attempts = {}; \
                     attempts after {} will have their build refused",
                    self.repetition_threshold, max_attempts, self.repetition_threshold
                ),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline() {
        let pipeline = FileInspectorsConfig::default().to_pipeline();
        assert_eq!(pipeline.names(), vec!["security", "syntax", "content"]);
    }

    #[test]
    fn test_repetition_opt_in() {
        let config = FileInspectorsConfig {
            repetition: true,
            repetition_threshold: 10,
            content: false,
        };
        assert_eq!(config.to_pipeline().names(), vec!["security", "syntax", "repetition"]);
        assert!(config.validate(5).is_empty());
    }

    #[test]
    fn test_threshold_issues() {
        let zero = FileInspectorsConfig {
            repetition: true,
            repetition_threshold: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(5)[0].code, ConfigIssueCode::ZeroRepetitionThreshold);

        let low = FileInspectorsConfig {
            repetition: true,
            repetition_threshold: 2,
            ..Default::default()
        };
        assert_eq!(low.validate(5)[0].code, ConfigIssueCode::RepetitionBelowAttempts);

        let off = FileInspectorsConfig {
            repetition_threshold: 0,
            ..Default::default()
        };
        assert!(off.validate(5).is_empty());
    }
}
