use thiserror::Error;

use crate::error::impl_error_conversions;
use crate::user_actor::UserError;

/// Errors that can occur during chef operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChefError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(ChefError, "Chef profile");
impl_error_conversions!(ChefError <- UserError);
