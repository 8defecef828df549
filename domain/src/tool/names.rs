//! Validation of container runtime identifiers passed as tool arguments.
//!
//! Docker tools pass these as separate argv entries, so the only concern is
//! that a value cannot be read as a flag or carry characters the runtime
//! would not accept anyway.

use crate::core::error::DomainError;

const MAX_NAME_LEN: usize = 255;

fn check(kind: &'static str, value: &str, extra: &[char]) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidName {
        kind,
        value: value.to_string(),
    };

    let first = value.chars().next().ok_or_else(invalid)?;
    if !first.is_ascii_alphanumeric() || value.len() > MAX_NAME_LEN {
        return Err(invalid());
    }
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || extra.contains(&c))
    {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Image reference such as `registry:5000/team/app:1.2` or `app@sha256:...`.
pub fn validate_image_reference(value: &str) -> Result<(), DomainError> {
    check("image reference", value, &['_', '.', '-', '/', ':', '@'])
}

/// Container name or id.
pub fn validate_container_name(value: &str) -> Result<(), DomainError> {
    check("container name", value, &['_', '.', '-'])
}

/// `docker logs --tail` value: a line count or `all`.
pub fn validate_tail(value: &str) -> Result<(), DomainError> {
    if value == "all" || (!value.is_empty() && value.chars().all(|c| c.is_ascii_digit())) {
        Ok(())
    } else {
        Err(DomainError::InvalidTail(value.to_string()))
    }
}
