//! Domain error types

use crate::tool::value_objects::ToolError;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid {kind}: {value:?}")]
    InvalidName { kind: &'static str, value: String },

    #[error("invalid log tail: {0:?} (expected a number or \"all\")")]
    InvalidTail(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

impl From<DomainError> for ToolError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Cancelled => ToolError::cancelled("operation"),
            other => ToolError::invalid_argument(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::InvalidTail("x".into()).is_cancelled());
    }

    #[test]
    fn test_invalid_name_maps_to_invalid_argument() {
        let err: ToolError = DomainError::InvalidName {
            kind: "image",
            value: "--privileged".into(),
        }
        .into();
        assert_eq!(err.code.as_str(), "INVALID_ARGUMENT");
        assert!(err.message.contains("--privileged"));
    }
}
