//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The closed set of business-meaningful failures. Every storage backend
/// translates its native failure signal into one of these kinds; anything it
/// cannot classify stays an infrastructure error and never becomes one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was empty or otherwise unusable.
    #[error("invalid product ID")]
    InvalidIdentifier,

    /// The targeted entity does not exist.
    #[error("product not found")]
    NotFound,

    /// An entity with the same identifier already exists.
    #[error("product with this ID already exists")]
    AlreadyExists,
}

impl DomainError {
    /// Stable machine-readable code, used in error responses and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid_identifier",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
        }
    }
}
