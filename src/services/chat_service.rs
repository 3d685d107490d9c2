//! Domain service for the polling chat between linked accounts.

use thiserror::Error;

use crate::db::Message;

/// Errors specific to chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Receiver not found")]
    ReceiverNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ChatError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for chat.
#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Stores a message from the caller to another account.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ReceiverNotFound`] when the receiver id does
    /// not exist and [`ChatError::Validation`] for empty content.
    async fn send(
        &self,
        sender_id: i32,
        receiver_id: i32,
        content: &str,
    ) -> Result<Message, ChatError>;

    /// The full thread between the caller and a contact, oldest first.
    /// Clients poll this; there is no push channel.
    async fn conversation(&self, user_id: i32, contact_id: i32)
    -> Result<Vec<Message>, ChatError>;
}
