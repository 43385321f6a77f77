//! HTTP surface: shared state, the router and its layers.
//!
//! Every route lives under `/api`. Handlers do request shaping only; the
//! clients own validation and orchestration.

pub mod admin;
pub mod cart;
pub mod cookers;
pub mod dishes;
pub mod extract;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod users;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::auth::IdentityVerifier;
use crate::clients::{
    CartClient, ChefClient, ConversationClient, DishClient, OrderClient, PaymentClient, ReviewClient,
    StatsClient, UserClient,
};
use crate::clock::Clock;
use crate::error::ApiError;
use crate::notifications::NotificationDispatcher;

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub users: UserClient,
    pub chefs: ChefClient,
    pub dishes: DishClient,
    pub carts: CartClient,
    pub orders: OrderClient,
    pub reviews: ReviewClient,
    pub conversations: ConversationClient,
    pub payments: PaymentClient,
    pub stats: StatsClient,
    pub notifier: NotificationDispatcher,
    pub identity: Arc<dyn IdentityVerifier>,
    pub clock: Arc<dyn Clock>,
}

/// Fails with a 400 carrying `message` when `value` is blank.
pub(crate) fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "Handler panicked");
    ApiError::Internal(detail.to_string()).into_response()
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(orders::routes())
        .merge(cart::routes())
        .merge(cookers::routes())
        .merge(dishes::routes())
        .merge(reviews::routes())
        .merge(messages::routes())
        .merge(notifications::routes())
        .merge(payments::routes())
        .merge(admin::routes());

    Router::new()
        .nest("/api", api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}
