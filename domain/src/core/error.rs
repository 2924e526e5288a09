//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Duplicate host name: {0}")]
    DuplicateHost(String),
}
