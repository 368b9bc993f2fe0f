//! # DomainError
//!
//! Centralized error handling for the settings-gate services.
//! Maps preference and feedback failures to the three kinds callers act on.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No valid user context (missing or blank user id)
    #[error("not authenticated")]
    NotAuthenticated,

    /// Rejected input (e.g., rating out of range, unknown role)
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage unreachable or a write failed
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Wraps a port failure. Ports speak `anyhow`; the services never leak it.
    pub fn persistence(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }

    /// Validation errors are final; persistence errors on reads may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
