//! Domain error kinds shared by product mutations and settings saves.

use thiserror::Error;

/// Failure of a domain operation.
///
/// Each variant maps to a distinct outcome the presentation layer can act
/// on; none of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required field is missing or a value cannot be parsed.
    #[error("{0}")]
    Validation(String),

    /// The referenced product does not exist.
    #[error("product not found")]
    NotFound,

    /// The current user does not own the referenced product.
    #[error("you do not have access to this product")]
    Unauthorized,
}

impl DomainError {
    /// Shorthand for a validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
