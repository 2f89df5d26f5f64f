//! Domain error model.

use thiserror::Error;

use crate::validation::Violation;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of client input. Storage
/// failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A request body broke one or more field rules.
    #[error("validation failed: {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Turn a violation list into a result: `Ok(())` when it is empty.
    pub fn check(violations: Vec<Violation>) -> DomainResult<()> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation(violations))
        }
    }
}
