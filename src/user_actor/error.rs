use thiserror::Error;

use crate::error::impl_error_conversions;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(UserError, "User");
