use thiserror::Error;

use crate::dish_actor::DishError;
use crate::error::impl_error_conversions;
use crate::user_actor::UserError;

/// Errors that can occur during review operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReviewError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(ReviewError, "Review");
impl_error_conversions!(ReviewError <- DishError, UserError);
