use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::{page_or_first, JsonBody, QueryParams};
use super::{require, AppState};
use crate::clients::{CatalogQuery, SearchQuery, DEFAULT_PAGE_SIZE};
use crate::domain::{DishCreate, DishPatch, CATEGORIES};
use crate::error::ApiError;

const DEFAULT_POPULAR_LIMIT: usize = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(catalog).post(create))
        .route("/dishes/popular", get(popular))
        .route("/dishes/categories", get(categories))
        .route("/dishes/search", get(search))
        .route("/dishes/{id}", get(detail).put(update).delete(remove))
        .route("/dishes/{id}/availability", put(availability))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CatalogParams {
    category: Option<String>,
    cooker_id: Option<String>,
    search: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchParams {
    q: String,
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OwnerParams {
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewDish {
    #[serde(default)]
    user_id: String,
    #[serde(flatten)]
    dish: DishCreate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DishUpdate {
    #[serde(default)]
    user_id: String,
    #[serde(flatten)]
    patch: DishPatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityUpdate {
    #[serde(default)]
    user_id: String,
    is_available: Option<bool>,
}

async fn catalog(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<CatalogParams>,
) -> Result<Json<Value>, ApiError> {
    let query = CatalogQuery {
        category: params.category.filter(|c| !c.is_empty()),
        cooker_id: params.cooker_id.filter(|c| !c.is_empty()),
        search: params.search,
        page: page_or_first(params.page),
        per_page: params.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let page = state.dishes.catalog(query).await?;
    Ok(Json(json!({
        "success": true,
        "dishes": page.items,
        "total": page.total,
        "page": page.page,
        "perPage": page.per_page,
    })))
}

async fn popular(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<CatalogParams>,
) -> Result<Json<Value>, ApiError> {
    let dishes = state.dishes.popular(params.limit.unwrap_or(DEFAULT_POPULAR_LIMIT)).await?;
    Ok(Json(json!({ "success": true, "dishes": dishes })))
}

async fn categories() -> Json<Value> {
    Json(json!({ "success": true, "categories": CATEGORIES }))
}

async fn search(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let category = params.category.filter(|c| !c.trim().is_empty());
    if params.q.trim().is_empty() && category.is_none() {
        return Ok(Json(json!({
            "success": true,
            "dishes": [],
            "message": "Please provide a search query or category",
        })));
    }
    let query = SearchQuery {
        q: params.q,
        category,
        min_price: params.min_price,
        max_price: params.max_price,
        limit: params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let dishes = state.dishes.search(query).await?;
    Ok(Json(json!({
        "success": true,
        "count": dishes.len(),
        "dishes": dishes,
    })))
}

async fn detail(State(state): State<AppState>, Path(dish_id): Path<String>) -> Result<Json<Value>, ApiError> {
    let dish = state.dishes.detail(dish_id).await?;
    Ok(Json(json!({ "success": true, "dish": dish })))
}

async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewDish>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require(&body.user_id, "userId is required")?;
    let dish = state.dishes.create(body.user_id, body.dish).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "تمت إضافة الطبق بنجاح",
            "dish": dish,
        })),
    ))
}

async fn update(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
    JsonBody(body): JsonBody<DishUpdate>,
) -> Result<Json<Value>, ApiError> {
    require(&body.user_id, "userId is required")?;
    state.dishes.update(dish_id, body.user_id, body.patch).await?;
    Ok(Json(json!({ "success": true, "message": "تم تحديث الطبق" })))
}

async fn remove(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
    QueryParams(params): QueryParams<OwnerParams>,
) -> Result<Json<Value>, ApiError> {
    require(&params.user_id, "userId is required")?;
    state.dishes.delete(dish_id, params.user_id).await?;
    Ok(Json(json!({ "success": true, "message": "تم حذف الطبق" })))
}

async fn availability(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
    JsonBody(body): JsonBody<AvailabilityUpdate>,
) -> Result<Json<Value>, ApiError> {
    require(&body.user_id, "userId is required")?;
    let available = body.is_available.unwrap_or(true);
    state.dishes.set_availability(dish_id, body.user_id, available).await?;
    let status = if available { "متاح" } else { "غير متاح" };
    Ok(Json(json!({
        "success": true,
        "message": format!("الطبق الآن {}", status),
        "isAvailable": available,
    })))
}
