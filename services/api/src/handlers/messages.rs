use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::messages::{ListMessagesUseCase, SendMessageInput, SendMessageUseCase};

// ── POST /messages ───────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SendMessageRequest {
    pub receiver_id: Option<Uuid>,
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub message: &'static str,
    pub message_id: Uuid,
}

pub async fn send_message(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), ApiError> {
    let usecase = SendMessageUseCase {
        messages: state.message_repo(),
    };
    let message_id = usecase
        .execute(
            caller.user_id,
            SendMessageInput {
                receiver_id: body.receiver_id,
                content: body.content,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message: "Message envoyé",
            message_id,
        }),
    ))
}

// ── GET /messages/{user_id} ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageEntry>,
}

#[derive(Serialize)]
pub struct MessageEntry {
    pub id: Uuid,
    pub content: String,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub sent_at: chrono::DateTime<chrono::Utc>,
    pub sender_name: String,
    pub receiver_name: String,
}

pub async fn list_messages(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let usecase = ListMessagesUseCase {
        users: state.user_repo(),
        messages: state.message_repo(),
    };
    let messages = usecase
        .execute(caller.user_id, user_id)
        .await?
        .into_iter()
        .map(|m| MessageEntry {
            id: m.id,
            content: m.content,
            sent_at: m.sent_at,
            sender_name: m.sender_name,
            receiver_name: m.receiver_name,
        })
        .collect();
    Ok(Json(MessagesResponse { messages }))
}
