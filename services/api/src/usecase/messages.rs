//! Direct messages between users.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{MessageRepository, UserRepository};
use crate::domain::types::{Message, MessageWithNames};
use crate::error::ApiError;
use crate::usecase::caller_role;

// ── POST /messages ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SendMessageInput {
    pub receiver_id: Option<Uuid>,
    pub content: Option<String>,
}

pub struct SendMessageUseCase<M: MessageRepository> {
    pub messages: M,
}

impl<M: MessageRepository> SendMessageUseCase<M> {
    /// The sender is always the authenticated caller; any authenticated user
    /// may write to any other.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        input: SendMessageInput,
    ) -> Result<Uuid, ApiError> {
        let content = input.content.filter(|c| !c.trim().is_empty());
        let (Some(receiver_id), Some(content)) = (input.receiver_id, content) else {
            return Err(ApiError::validation("Destinataire et contenu requis"));
        };

        let message = Message {
            id: Uuid::now_v7(),
            sender_id: caller_id,
            receiver_id,
            content,
            sent_at: Utc::now(),
        };
        self.messages.create(&message).await?;
        Ok(message.id)
    }
}

// ── GET /messages/{user_id} ──────────────────────────────────────────────────

pub struct ListMessagesUseCase<U: UserRepository, M: MessageRepository> {
    pub users: U,
    pub messages: M,
}

impl<U: UserRepository, M: MessageRepository> ListMessagesUseCase<U, M> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<MessageWithNames>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || caller_id == user_id) {
            return Err(ApiError::Forbidden("Non autorisé à voir ces messages"));
        }
        self.messages.list_for_user(user_id).await
    }
}
