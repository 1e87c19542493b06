//! Repository for the `chat_messages` table.

use sqlx::PgPool;
use vidgen_core::types::DbId;

use crate::models::chat_message::{ChatMessage, CreateChatMessage};

const COLUMNS: &str = "id, user_id, kind, content, video_id, created_at, updated_at";

/// Number of messages returned by [`ChatMessageRepo::list_recent`].
pub const HISTORY_LIMIT: i64 = 50;

pub struct ChatMessageRepo;

impl ChatMessageRepo {
    /// Append a message.
    pub async fn create(
        pool: &PgPool,
        input: &CreateChatMessage,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (user_id, kind, content, video_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(input.user_id)
            .bind(&input.kind)
            .bind(&input.content)
            .bind(input.video_id)
            .fetch_one(pool)
            .await
    }

    /// The user's latest [`HISTORY_LIMIT`] messages, oldest first.
    pub async fn list_recent(pool: &PgPool, user_id: DbId) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                 SELECT {COLUMNS} FROM chat_messages \
                 WHERE user_id = $1 \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $2 \
             ) recent \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user_id)
            .bind(HISTORY_LIMIT)
            .fetch_all(pool)
            .await
    }
}
