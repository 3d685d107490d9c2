use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::db::Message;
use crate::services::auth_service::Claims;
use crate::services::chat_service::ChatError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: i32,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationQuery {
    pub contact_id: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::ReceiverNotFound => Self::NotFound("Receiver not found".to_string()),
            ChatError::Validation(msg) => Self::validation(msg),
            ChatError::Database(msg) | ChatError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /chat
/// Send a message to another account
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<MessageDto>>, ApiError> {
    let message = state
        .chat_service()
        .send(claims.sub, payload.receiver_id, &payload.content)
        .await?;

    Ok(Json(ApiResponse::success(MessageDto::from(message))))
}

/// GET /chat?contactId=N
/// The thread between the caller and a contact, oldest first. Clients
/// poll this on an interval; there is no push channel.
pub async fn conversation(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<ApiResponse<Vec<MessageDto>>>, ApiError> {
    let messages = state
        .chat_service()
        .conversation(claims.sub, query.contact_id)
        .await?;

    let dtos: Vec<MessageDto> = messages.into_iter().map(MessageDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}
