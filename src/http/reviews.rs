use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::{page_or_first, JsonBody, OptionalJson, QueryParams};
use super::AppState;
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::clients::NewReview;
use crate::domain::{parse_rating, ReviewPatch, DEFAULT_REPORT_REASON};
use crate::error::ApiError;

const DEFAULT_REVIEWS_PER_PAGE: usize = 10;
const INVALID_RATING: &str = "Rating must be between 1 and 5";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create))
        .route("/reviews/dish/{dish_id}", post(create_for_dish).get(list_for_dish))
        .route("/reviews/{id}", put(update).delete(remove))
        .route("/reviews/{id}/report", post(report))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReviewBody {
    dish_id: Option<String>,
    order_id: Option<String>,
    user_id: Option<String>,
    rating: Option<f64>,
    comment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReviewPage {
    page: Option<usize>,
    per_page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReviewEdit {
    rating: Option<f64>,
    comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReportBody {
    reason: Option<String>,
}

/// The body's `userId` wins; otherwise a verified bearer token names the author.
async fn submit(
    state: &AppState,
    caller: MaybeAuthUser,
    dish_id: Option<String>,
    body: ReviewBody,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user_id = body
        .user_id
        .filter(|id| !id.is_empty())
        .or(caller.0.map(|claim| claim.uid))
        .ok_or_else(|| ApiError::Unauthorized("User authentication required".into()))?;
    let (Some(dish_id), Some(rating)) = (dish_id.filter(|id| !id.is_empty()), body.rating) else {
        return Err(ApiError::Validation("Missing dishId or rating".into()));
    };
    let rating = parse_rating(rating).ok_or_else(|| ApiError::Validation(INVALID_RATING.into()))?;

    let review = NewReview {
        dish_id,
        user_id,
        order_id: body.order_id,
        rating,
        comment: body.comment,
    };
    let (created, summary) = state.reviews.create(review).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Review added successfully",
            "data": {
                "reviewId": created.id,
                "newAvgRating": summary.rating,
                "reviewCount": summary.review_count,
            },
        })),
    ))
}

async fn create(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    JsonBody(mut body): JsonBody<ReviewBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let dish_id = body.dish_id.take();
    submit(&state, caller, dish_id, body).await
}

async fn create_for_dish(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Path(dish_id): Path<String>,
    JsonBody(body): JsonBody<ReviewBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    submit(&state, caller, Some(dish_id), body).await
}

async fn list_for_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
    QueryParams(params): QueryParams<ReviewPage>,
) -> Result<Json<Value>, ApiError> {
    let page = state
        .reviews
        .list_for_dish(
            dish_id,
            page_or_first(params.page),
            params.per_page.unwrap_or(DEFAULT_REVIEWS_PER_PAGE),
        )
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": {
            "reviews": page.items,
            "page": page.page,
            "per_page": page.per_page,
            "total": page.total,
            "pages": page.pages,
        },
    })))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(review_id): Path<String>,
    JsonBody(body): JsonBody<ReviewEdit>,
) -> Result<Json<Value>, ApiError> {
    let rating = match body.rating {
        Some(raw) => Some(parse_rating(raw).ok_or_else(|| ApiError::Validation(INVALID_RATING.into()))?),
        None => None,
    };
    let patch = ReviewPatch {
        rating,
        comment: body.comment,
        ..ReviewPatch::default()
    };
    let review = state.reviews.update(review_id, claim.uid, patch).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Review updated successfully",
        "review": review,
    })))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(review_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let summary = state.reviews.delete(review_id, claim.uid).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Review deleted successfully",
        "data": {
            "newAvgRating": summary.rating,
            "reviewCount": summary.review_count,
        },
    })))
}

async fn report(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    Path(review_id): Path<String>,
    OptionalJson(body): OptionalJson<ReportBody>,
) -> Result<Json<Value>, ApiError> {
    let reason = body
        .reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_REASON.to_string());
    state.reviews.report(review_id, claim.uid, reason).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Review reported successfully",
    })))
}
