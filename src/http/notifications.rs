use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::{JsonBody, OptionalJson};
use super::AppState;
use crate::auth::AuthUser;
use crate::domain::NotificationSettings;
use crate::error::ApiError;
use crate::notifications::{DEFAULT_TEST_BODY, DEFAULT_TEST_TITLE};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications/register", post(register))
        .route("/notifications/settings", get(settings).put(update_settings))
        .route("/notifications/test", post(send_test))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TokenBody {
    fcm_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TestBody {
    title: Option<String>,
    body: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    JsonBody(body): JsonBody<TokenBody>,
) -> Result<Json<Value>, ApiError> {
    state.users.ensure_user(claim.uid.clone(), claim.name, claim.email).await?;
    state.users.register_push_token(claim.uid, body.fcm_token).await?;
    Ok(Json(json!({
        "success": true,
        "message": "FCM token registered successfully",
    })))
}

async fn settings(State(state): State<AppState>, AuthUser(claim): AuthUser) -> Result<Json<Value>, ApiError> {
    let user = state.users.find_user(claim.uid).await?;
    Ok(Json(json!({
        "success": true,
        "settings": user.notification_settings,
    })))
}

async fn update_settings(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    OptionalJson(settings): OptionalJson<NotificationSettings>,
) -> Result<Json<Value>, ApiError> {
    state.users.update_notification_settings(claim.uid, settings).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Notification settings updated",
    })))
}

/// Sends a test push to the caller. Delivery problems come back as a 400, never an error page.
async fn send_test(
    State(state): State<AppState>,
    AuthUser(claim): AuthUser,
    OptionalJson(body): OptionalJson<TestBody>,
) -> (StatusCode, Json<Value>) {
    let title = body.title.unwrap_or_else(|| DEFAULT_TEST_TITLE.to_string());
    let text = body.body.unwrap_or_else(|| DEFAULT_TEST_BODY.to_string());
    if state.notifier.send_test(&claim.uid, title, text).await {
        (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Test notification sent" })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Failed to send notification. Check FCM token." })),
        )
    }
}
