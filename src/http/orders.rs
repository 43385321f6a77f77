use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::AppState;
use crate::auth::AuthUser;
use crate::clients::PlaceOrder;
use crate::domain::Order;
use crate::error::ApiError;
use crate::order_actor::OrderPhase;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create).get(list))
        .route("/orders/{id}", get(detail))
        .route("/orders/{id}/cancel", post(cancel))
        .route("/orders/{id}/status", put(set_status))
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: String,
}

async fn create(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(request): JsonBody<PlaceOrder>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let order = state.orders.place_order(claim.uid, claim.email, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "orderId": order.id,
            "total": order.total,
            "message": "تم إنشاء الطلب بنجاح",
        })),
    ))
}

async fn list(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<Value>, ApiError> {
    let orders = state.orders.list_for_customer(claim.uid).await?;
    Ok(Json(json!({ "orders": orders })))
}

async fn detail(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.order_for_customer(order_id, claim.uid).await?))
}

/// Customer cancellation, only while the order is still pending.
async fn cancel(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.orders.cancel(order_id, claim.uid).await?;
    Ok(Json(json!({
        "success": true,
        "message": "تم إلغاء الطلب بنجاح",
    })))
}

async fn set_status(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(order_id): Path<String>,
    JsonBody(body): JsonBody<StatusBody>,
) -> Result<Json<Value>, ApiError> {
    let phase: OrderPhase = body.status.parse().map_err(ApiError::Validation)?;
    let order = state.orders.set_status(order_id, claim.uid, phase).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Order status updated to {}", order.phase),
        "status": order.phase.status(),
        "chefStatus": order.phase.chef_status(),
    })))
}
