//! Direct messaging. Most routes take participant ids explicitly; sending a
//! direct message prefers the bearer identity when one is presented.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::{page_or_first, JsonBody, OptionalJson, QueryParams};
use super::{require, AppState};
use crate::auth::MaybeAuthUser;
use crate::error::ApiError;

const DEFAULT_MESSAGES_PER_PAGE: usize = 50;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(send_direct))
        .route("/messages/conversations", get(inbox).post(open))
        .route("/messages/conversations/{id}/messages", get(history).post(post_message))
        .route("/messages/conversations/{id}/mark-read", post(mark_read))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DirectMessage {
    receiver_id: String,
    content: Option<String>,
    text: Option<String>,
    sender_id: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConversationMessage {
    sender_id: String,
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Participant {
    user_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Pair {
    user_id1: String,
    user_id2: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessagePage {
    page: Option<usize>,
    per_page: Option<usize>,
}

async fn send_direct(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    JsonBody(body): JsonBody<DirectMessage>,
) -> Result<Json<Value>, ApiError> {
    let content = body.content.filter(|c| !c.is_empty()).or(body.text).unwrap_or_default();
    if body.receiver_id.is_empty() || content.is_empty() {
        return Err(ApiError::Validation("Missing receiverId or content".into()));
    }
    let sender_id = caller
        .0
        .map(|claim| claim.uid)
        .or(body.sender_id)
        .or(body.user_id)
        .unwrap_or_default();
    require(&sender_id, "Missing senderId")?;

    let (conversation_id, message) = state
        .conversations
        .send_direct(sender_id, body.receiver_id, content)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Message sent",
        "data": { "messageId": message.id, "conversationId": conversation_id },
    })))
}

async fn inbox(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<Participant>,
) -> Result<Json<Value>, ApiError> {
    require(&query.user_id, "Missing userId")?;
    let conversations = state.conversations.inbox(query.user_id).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "conversations": conversations },
    })))
}

async fn open(State(state): State<AppState>, JsonBody(body): JsonBody<Pair>) -> Result<Json<Value>, ApiError> {
    let (conversation, existed) = state.conversations.open(body.user_id1, body.user_id2).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "conversationId": conversation.id, "existed": existed },
    })))
}

async fn history(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    QueryParams(query): QueryParams<MessagePage>,
) -> Result<Json<Value>, ApiError> {
    let messages = state
        .conversations
        .messages(
            conversation_id,
            page_or_first(query.page),
            query.per_page.unwrap_or(DEFAULT_MESSAGES_PER_PAGE),
        )
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": { "messages": messages },
    })))
}

async fn post_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    JsonBody(body): JsonBody<ConversationMessage>,
) -> Result<Json<Value>, ApiError> {
    if body.sender_id.is_empty() || body.text.is_empty() {
        return Err(ApiError::Validation("Missing senderId or text".into()));
    }
    let message = state.conversations.post(conversation_id, body.sender_id, body.text).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Message sent",
        "data": { "messageId": message.id },
    })))
}

async fn mark_read(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    OptionalJson(body): OptionalJson<Participant>,
) -> Result<Json<Value>, ApiError> {
    require(&body.user_id, "Missing userId")?;
    let marked = state.conversations.mark_read(conversation_id, body.user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Messages marked as read",
        "data": { "marked": marked },
    })))
}
