//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: log and message trimming helpers

pub mod error;
pub mod string;
