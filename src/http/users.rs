use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::{JsonBody, OptionalJson};
use super::AppState;
use crate::auth::AuthUser;
use crate::domain::{NewAddress, User, UserPatch};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FavoriteDetails {
    dish_name: String,
    dish_image: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(profile).put(update_profile))
        .route("/users/addresses", get(addresses).post(add_address))
        .route("/users/addresses/{address_id}", delete(remove_address))
        .route("/users/favorites", get(favorites))
        .route("/users/favorites/{dish_id}", post(add_favorite).delete(remove_favorite))
}

/// The caller's profile, created from the identity claim on first access.
async fn profile(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<User>, ApiError> {
    let user = state.users.ensure_user(claim.uid, claim.name, claim.email).await?;
    Ok(Json(user))
}

async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<Json<Value>, ApiError> {
    state.users.ensure_user(claim.uid.clone(), claim.name, claim.email).await?;
    let user = state.users.update_profile(claim.uid, patch).await?;
    Ok(Json(json!({
        "success": true,
        "message": "تم تحديث الملف الشخصي",
        "user": user,
    })))
}

async fn addresses(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<Value>, ApiError> {
    let addresses = state.users.addresses(claim.uid).await?;
    Ok(Json(json!({ "addresses": addresses })))
}

async fn add_address(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(address): JsonBody<NewAddress>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    super::require(&address.address, "Address is required")?;
    state.users.ensure_user(claim.uid.clone(), claim.name, claim.email).await?;
    let address = state.users.add_address(claim.uid, address).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "address": address,
            "message": "تم إضافة العنوان",
        })),
    ))
}

async fn remove_address(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(address_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.users.remove_address(claim.uid, address_id).await?;
    Ok(Json(json!({ "success": true, "message": "تم حذف العنوان" })))
}

async fn favorites(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<Value>, ApiError> {
    let favorites = state.users.favorites(claim.uid).await?;
    Ok(Json(json!({ "favorites": favorites })))
}

async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(dish_id): Path<String>,
    OptionalJson(details): OptionalJson<FavoriteDetails>,
) -> Result<Json<Value>, ApiError> {
    state.users.ensure_user(claim.uid.clone(), claim.name, claim.email).await?;
    let added = state
        .users
        .add_favorite(claim.uid, dish_id, details.dish_name, details.dish_image)
        .await?;
    if !added {
        return Ok(Json(json!({ "message": "Already in favorites" })));
    }
    Ok(Json(json!({ "success": true, "message": "تمت الإضافة إلى المفضلة" })))
}

async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(dish_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.users.remove_favorite(claim.uid, dish_id).await?;
    Ok(Json(json!({ "success": true, "message": "تمت الإزالة من المفضلة" })))
}
