use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{messages, prelude::*};

/// Repository for chat messages
pub struct MessageRepository {
    conn: DatabaseConnection,
}

impl MessageRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        sender_id: i32,
        receiver_id: i32,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<messages::Model> {
        let active = messages::ActiveModel {
            sender_id: Set(sender_id),
            receiver_id: Set(receiver_id),
            content: Set(content.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let res = Messages::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert message")?;

        Ok(messages::Model {
            id: res.last_insert_id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            created_at: now,
        })
    }

    /// Full thread between two users in either direction, oldest first
    pub async fn conversation(
        &self,
        user_a: i32,
        user_b: i32,
    ) -> Result<Vec<messages::Model>> {
        let rows = Messages::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(messages::Column::SenderId.eq(user_a))
                            .add(messages::Column::ReceiverId.eq(user_b)),
                    )
                    .add(
                        Condition::all()
                            .add(messages::Column::SenderId.eq(user_b))
                            .add(messages::Column::ReceiverId.eq(user_a)),
                    ),
            )
            .order_by_asc(messages::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to query conversation")?;

        Ok(rows)
    }
}
