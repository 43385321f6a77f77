//! Back-office routes. Every handler takes [`AdminUser`].

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::extract::{page_or_first, OptionalJson, QueryParams};
use super::AppState;
use crate::auth::AdminUser;
use crate::clients::{Page, PlatformStats};
use crate::domain::ReportAction;
use crate::error::ApiError;

const DEFAULT_USERS_PER_PAGE: usize = 20;
const DEFAULT_ORDER_LIMIT: usize = 50;
const DEFAULT_BAN_REASON: &str = "Violation of terms of service";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/users", get(users))
        .route("/admin/users/{id}/ban", post(ban))
        .route("/admin/users/{id}/unban", post(unban))
        .route("/admin/chefs", get(chefs))
        .route("/admin/chefs/{id}/verify", post(verify_chef))
        .route("/admin/orders", get(orders))
        .route("/admin/reports", get(reports))
        .route("/admin/reports/{id}/resolve", post(resolve_report))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListParams {
    page: Option<usize>,
    limit: Option<usize>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BanBody {
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Resolution {
    action: ReportAction,
}

async fn stats(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<PlatformStats>, ApiError> {
    Ok(Json(state.stats.platform_stats().await?))
}

async fn users(
    State(state): State<AppState>,
    _admin: AdminUser,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let all = state.users.list_users().await?;
    let page = Page::of(
        all,
        page_or_first(params.page),
        params.limit.unwrap_or(DEFAULT_USERS_PER_PAGE),
    );
    Ok(Json(json!({
        "users": page.items,
        "page": page.page,
        "limit": page.per_page,
        "total": page.total,
    })))
}

async fn ban(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
    OptionalJson(body): OptionalJson<BanBody>,
) -> Result<Json<Value>, ApiError> {
    let reason = body
        .reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BAN_REASON.to_string());
    let user = state.users.ban(user_id, reason).await?;
    info!(user_id = %user.id, banned_by = %admin.uid, "User banned");
    Ok(Json(json!({
        "success": true,
        "message": format!("User {} banned successfully", user.id),
    })))
}

async fn unban(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = state.users.unban(user_id).await?;
    info!(user_id = %user.id, unbanned_by = %admin.uid, "User unbanned");
    Ok(Json(json!({
        "success": true,
        "message": format!("User {} unbanned successfully", user.id),
    })))
}

async fn chefs(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Value>, ApiError> {
    let chefs = state.stats.chef_overview().await?;
    Ok(Json(json!({ "chefs": chefs })))
}

async fn verify_chef(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(chef_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let chef = state.chefs.verify(chef_id).await?;
    info!(chef_id = %chef.id, verified_by = %admin.uid, "Chef verified");
    Ok(Json(json!({
        "success": true,
        "message": format!("Chef {} verified successfully", chef.id),
    })))
}

async fn orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let status = params.status.filter(|s| !s.is_empty());
    let orders = state
        .orders
        .list_all(status, params.limit.unwrap_or(DEFAULT_ORDER_LIMIT))
        .await?;
    Ok(Json(json!({ "orders": orders })))
}

async fn reports(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Value>, ApiError> {
    let reports = state.reviews.list_reported().await?;
    Ok(Json(json!({ "reports": reports })))
}

async fn resolve_report(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(review_id): Path<String>,
    OptionalJson(body): OptionalJson<Resolution>,
) -> Result<Json<Value>, ApiError> {
    state.reviews.resolve_report(review_id, admin.uid, body.action).await?;
    let action = match body.action {
        ReportAction::Dismiss => "dismiss",
        ReportAction::Remove => "remove",
    };
    Ok(Json(json!({
        "success": true,
        "message": format!("Report resolved with action: {}", action),
    })))
}
