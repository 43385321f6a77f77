//! Chef self-service. Callers name themselves with an explicit `userId` in the
//! body or query string rather than a bearer token.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::{page_or_first, JsonBody, QueryParams};
use super::{require, AppState};
use crate::clients::DEFAULT_PAGE_SIZE;
use crate::domain::{ChefPatch, ChefRegistration};
use crate::error::ApiError;
use crate::order_actor::{ChefDecision, ChefStage};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cookers/register", post(register))
        .route("/cookers/profile", get(profile).put(update_profile))
        .route("/cookers/availability", put(availability))
        .route("/cookers/stats", get(stats))
        .route("/cookers/dishes", get(dishes))
        .route("/cookers/orders", get(orders))
        .route("/cookers/orders/{id}/respond", put(respond))
        .route("/cookers/orders/{id}/status", put(advance))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ChefQuery {
    user_id: String,
    status: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl ChefQuery {
    fn chef_id(&self) -> Result<String, ApiError> {
        require(&self.user_id, "userId is required")?;
        Ok(self.user_id.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Registration {
    #[serde(default)]
    user_id: String,
    #[serde(flatten)]
    profile: ChefRegistration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate {
    #[serde(default)]
    user_id: String,
    #[serde(flatten)]
    patch: ChefPatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityUpdate {
    #[serde(default)]
    user_id: String,
    is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OrderCommand {
    user_id: String,
    action: String,
    status: String,
    reason: String,
}

async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Registration>,
) -> Result<Json<Value>, ApiError> {
    let chef = state.chefs.register(body.user_id, body.profile).await?;
    Ok(Json(json!({
        "success": true,
        "message": "تم التسجيل كطباخ بنجاح",
        "chef": chef,
    })))
}

async fn profile(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ChefQuery>,
) -> Result<Json<Value>, ApiError> {
    let chef = state.chefs.find_chef(query.chef_id()?).await?;
    Ok(Json(json!({ "success": true, "chef": chef })))
}

async fn update_profile(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    require(&body.user_id, "userId is required")?;
    state.chefs.update_profile(body.user_id, body.patch).await?;
    Ok(Json(json!({
        "success": true,
        "message": "تم تحديث الملف الشخصي",
    })))
}

/// Takes effect in public listings only once the active-chef snapshot expires.
async fn availability(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AvailabilityUpdate>,
) -> Result<Json<Value>, ApiError> {
    require(&body.user_id, "userId is required")?;
    let active = body.is_active.unwrap_or(true);
    state.chefs.set_availability(body.user_id, active).await?;
    let status = if active { "متاح" } else { "غير متاح" };
    Ok(Json(json!({
        "success": true,
        "message": format!("أنت الآن {}", status),
        "isActive": active,
    })))
}

async fn stats(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ChefQuery>,
) -> Result<Json<Value>, ApiError> {
    let stats = state.stats.chef_stats(query.chef_id()?).await?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}

async fn dishes(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ChefQuery>,
) -> Result<Json<Value>, ApiError> {
    let dishes = state.dishes.list_for_chef(query.chef_id()?).await?;
    Ok(Json(json!({
        "success": true,
        "count": dishes.len(),
        "dishes": dishes,
    })))
}

async fn orders(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ChefQuery>,
) -> Result<Json<Value>, ApiError> {
    let chef_id = query.chef_id()?;
    let page = state
        .orders
        .list_for_chef(
            chef_id,
            query.status,
            page_or_first(query.page),
            query.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(json!({
        "success": true,
        "orders": page.items,
        "total": page.total,
        "page": page.page,
        "perPage": page.per_page,
    })))
}

async fn respond(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    JsonBody(body): JsonBody<OrderCommand>,
) -> Result<Json<Value>, ApiError> {
    if body.user_id.is_empty() || body.action.is_empty() {
        return Err(ApiError::Validation("userId and action are required".into()));
    }
    let decision: ChefDecision = body.action.parse().map_err(ApiError::Validation)?;
    state.orders.respond(order_id, body.user_id, decision, body.reason).await?;
    Ok(Json(json!({ "success": true, "message": decision.message() })))
}

async fn advance(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    JsonBody(body): JsonBody<OrderCommand>,
) -> Result<Json<Value>, ApiError> {
    if body.user_id.is_empty() || body.status.is_empty() {
        return Err(ApiError::Validation("userId and status are required".into()));
    }
    let stage: ChefStage = body.status.parse().map_err(ApiError::Validation)?;
    state.orders.advance(order_id, body.user_id, stage).await?;
    Ok(Json(json!({ "success": true, "message": stage.message() })))
}
