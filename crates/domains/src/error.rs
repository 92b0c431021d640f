//! # DomainError
//!
//! Centralized error taxonomy for the NutriHub workflows.
//! Every failure is scoped to a single request; nothing here is fatal.

use thiserror::Error;

/// The primary error type for all workflow operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Referenced entity absent (e.g., Query, Solution, Tip)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Malformed or missing input; user-correctable
    #[error("validation error: {0}")]
    Validation(String),

    /// Actor lacks ownership/role for the target, or is unauthenticated
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Duplicate-submission attempt
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence or infrastructure failure, opaque to the caller
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for NutriHub workflow logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;

impl DomainError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound(entity.to_string(), id.to_string())
    }
}
