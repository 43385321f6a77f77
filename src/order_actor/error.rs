use thiserror::Error;

use crate::chef_actor::ChefError;
use crate::dish_actor::DishError;
use crate::error::impl_error_conversions;
use crate::user_actor::UserError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(OrderError, "Order");
impl_error_conversions!(OrderError <- UserError, ChefError, DishError);
