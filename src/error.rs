//! Wire-level error taxonomy.
//!
//! Every domain error ends up as an [`ApiError`], which renders as
//! `{"error": <message>, "status": <code>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, Error, PartialEq)]
#[allow(dead_code)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    RateLimited(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message shown to the client. Server-side failures keep their detail in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            ApiError::ServiceUnavailable(_) => "Database unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %self, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

/// Wires a domain error enum into the framework and wire taxonomies.
///
/// The enum must carry the four shared variants `NotFound`, `ValidationError`,
/// `Forbidden` and `ActorCommunicationError`, all holding a `String`. A missing
/// document becomes `NotFound("<document> not found")`.
/// The `<-` form converts between two such enums variant by variant.
macro_rules! impl_error_conversions {
    ($error:ident, $document:literal) => {
        impl From<$crate::actor_framework::FrameworkError> for $error {
            fn from(e: $crate::actor_framework::FrameworkError) -> Self {
                use $crate::actor_framework::FrameworkError;
                match e {
                    FrameworkError::NotFound(_) => $error::NotFound(concat!($document, " not found").to_string()),
                    FrameworkError::Validation(msg) => $error::ValidationError(msg),
                    FrameworkError::Forbidden(msg) => $error::Forbidden(msg),
                    other => $error::ActorCommunicationError(other.to_string()),
                }
            }
        }

        impl From<$error> for $crate::error::ApiError {
            fn from(e: $error) -> Self {
                use $crate::error::ApiError;
                match e {
                    $error::NotFound(msg) => ApiError::NotFound(msg),
                    $error::ValidationError(msg) => ApiError::Validation(msg),
                    $error::Forbidden(msg) => ApiError::Forbidden(msg),
                    $error::ActorCommunicationError(msg) => ApiError::ServiceUnavailable(msg),
                }
            }
        }
    };
    ($target:ident <- $($source:ident),+) => {
        $(
            impl From<$source> for $target {
                fn from(e: $source) -> Self {
                    match e {
                        $source::NotFound(msg) => $target::NotFound(msg),
                        $source::ValidationError(msg) => $target::ValidationError(msg),
                        $source::Forbidden(msg) => $target::Forbidden(msg),
                        $source::ActorCommunicationError(msg) => $target::ActorCommunicationError(msg),
                    }
                }
            }
        )+
    };
}

pub(crate) use impl_error_conversions;
