//! `SeaORM` implementation of the `ChatService` trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::clock::Clock;
use crate::db::{Message, Store};
use crate::services::chat_service::{ChatError, ChatService};

pub struct SeaOrmChatService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SeaOrmChatService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl ChatService for SeaOrmChatService {
    async fn send(
        &self,
        sender_id: i32,
        receiver_id: i32,
        content: &str,
    ) -> Result<Message, ChatError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::Validation(
                "Message content cannot be empty".to_string(),
            ));
        }

        if self.store.get_user_by_id(receiver_id).await?.is_none() {
            return Err(ChatError::ReceiverNotFound);
        }

        let now = self.clock.now();
        let message = self
            .store
            .insert_message(sender_id, receiver_id, content, now)
            .await?;

        Ok(message)
    }

    async fn conversation(
        &self,
        user_id: i32,
        contact_id: i32,
    ) -> Result<Vec<Message>, ChatError> {
        Ok(self.store.conversation(user_id, contact_id).await?)
    }
}
