use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::AppState;
use crate::auth::AuthUser;
use crate::clients::AddToCart;
use crate::domain::Cart;
use crate::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(show))
        .route("/cart/add", post(add))
        .route("/cart/update", put(update))
        .route("/cart/remove/{dish_id}", delete(remove))
        .route("/cart/clear", delete(clear))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantityUpdate {
    dish_id: Option<String>,
    quantity: Option<i64>,
}

fn summary(cart: &Cart) -> Value {
    json!({
        "success": true,
        "itemCount": cart.items.len(),
        "total": cart.total,
    })
}

fn with_message(mut body: Value, message: &str) -> Value {
    body["message"] = json!(message);
    body
}

async fn show(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.carts.cart_for(claim.uid).await?))
}

async fn add(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(request): JsonBody<AddToCart>,
) -> Result<Json<Value>, ApiError> {
    let cart = state.carts.add_item(claim.uid, request).await?;
    Ok(Json(with_message(summary(&cart), "تمت الإضافة إلى السلة")))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(body): JsonBody<QuantityUpdate>,
) -> Result<Json<Value>, ApiError> {
    let (Some(dish_id), Some(quantity)) = (body.dish_id, body.quantity) else {
        return Err(ApiError::Validation("dishId and quantity required".into()));
    };
    let cart = state.carts.update_item(claim.uid, dish_id, quantity).await?;
    Ok(Json(summary(&cart)))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(dish_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let cart = state.carts.remove_item(claim.uid, dish_id).await?;
    Ok(Json(with_message(summary(&cart), "تمت الإزالة من السلة")))
}

async fn clear(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<Value>, ApiError> {
    state.carts.clear(claim.uid).await?;
    Ok(Json(json!({
        "success": true,
        "message": "تم تفريغ السلة",
    })))
}
