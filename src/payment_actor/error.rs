use thiserror::Error;

use crate::error::impl_error_conversions;
use crate::order_actor::OrderError;

/// Errors that can occur during payment operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl_error_conversions!(PaymentError, "Payment");
impl_error_conversions!(PaymentError <- OrderError);
