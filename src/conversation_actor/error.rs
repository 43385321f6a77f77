use thiserror::Error;

use crate::error::impl_error_conversions;
use crate::user_actor::UserError;

/// Errors that can occur during messaging operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MessageError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(MessageError, "Conversation");
impl_error_conversions!(MessageError <- UserError);
