use thiserror::Error;

use crate::chef_actor::ChefError;
use crate::dish_actor::DishError;
use crate::error::impl_error_conversions;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(CartError, "Cart");
impl_error_conversions!(CartError <- DishError, ChefError);
