use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::AppState;
use crate::auth::AuthUser;
use crate::domain::PAYMENT_METHODS;
use crate::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/methods", get(methods))
        .route("/payments/confirm", post(confirm))
        .route("/payments/history", get(history))
        .route("/payments/refund", post(refund))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Confirmation {
    order_id: String,
    payment_method: String,
    payment_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RefundBody {
    order_id: String,
    reason: String,
}

async fn methods(AuthUser(_): AuthUser) -> Json<Value> {
    Json(json!({ "success": true, "methods": PAYMENT_METHODS }))
}

async fn confirm(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(body): JsonBody<Confirmation>,
) -> Result<Json<Value>, ApiError> {
    let (order, _) = state
        .payments
        .confirm(claim.uid, body.order_id, body.payment_method, body.payment_id)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Payment confirmed",
        "paymentStatus": order.payment_status,
    })))
}

async fn history(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<Value>, ApiError> {
    let payments = state.payments.history(claim.uid).await?;
    Ok(Json(json!({ "success": true, "payments": payments })))
}

async fn refund(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(body): JsonBody<RefundBody>,
) -> Result<Json<Value>, ApiError> {
    let refund = state.payments.request_refund(claim.uid, body.order_id, body.reason).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Refund request submitted",
        "refundId": refund.id,
    })))
}
