use thiserror::Error;

use crate::chef_actor::ChefError;
use crate::error::impl_error_conversions;

/// Errors that can occur during dish operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DishError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(DishError, "Dish");
impl_error_conversions!(DishError <- ChefError);
