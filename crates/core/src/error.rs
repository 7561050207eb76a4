//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// authorization, idempotency signals). Infrastructure concerns belong
/// elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed or empty input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An authorization predicate returned false.
    #[error("permission denied")]
    PermissionDenied,

    /// A referenced entity does not exist (domain-level).
    #[error("not found")]
    NotFound,

    /// The caller already holds a membership in the target institution.
    #[error("already joined")]
    AlreadyJoined,

    /// A role label is unknown in the target institution or reserved for
    /// its managers.
    #[error("invalid role: {0}")]
    InvalidRole(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_role(msg: impl Into<String>) -> Self {
        Self::InvalidRole(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
