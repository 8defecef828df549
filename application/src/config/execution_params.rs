//! Execution parameters: agent loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! loop in [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Upper bound for the post-start wait of `docker_run`.
pub const MAX_TEST_TIMEOUT_SECS: u64 = 300;

/// Agent loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of generate/write/build/test attempts.
    pub max_attempts: u32,
    /// Tag given to the image built in each attempt.
    pub image_tag: String,
    /// Seconds the test container must stay up.
    pub test_timeout_secs: u64,
    /// Capacity of the progress event channel.
    pub event_buffer: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            image_tag: "dockerize-test:latest".to_string(),
            test_timeout_secs: 30,
            event_buffer: 100,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_image_tag(mut self, tag: impl Into<String>) -> Self {
        self.image_tag = tag.into();
        self
    }

    /// Values above [`MAX_TEST_TIMEOUT_SECS`] are clamped.
    pub fn with_test_timeout_secs(mut self, secs: u64) -> Self {
        self.test_timeout_secs = secs.min(MAX_TEST_TIMEOUT_SECS);
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_attempts, 5);
        assert_eq!(params.image_tag, "dockerize-test:latest");
        assert_eq!(params.test_timeout_secs, 30);
        assert_eq!(params.event_buffer, 100);
    }

    #[test]
    fn test_timeout_is_clamped() {
        let params = ExecutionParams::default().with_test_timeout_secs(3600);
        assert_eq!(params.test_timeout_secs, MAX_TEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_builder_chain() {
        let params = ExecutionParams::default()
            .with_max_attempts(2)
            .with_image_tag("app:ci")
            .with_event_buffer(8);
        assert_eq!(params.max_attempts, 2);
        assert_eq!(params.image_tag, "app:ci");
        assert_eq!(params.event_buffer, 8);
    }
}
