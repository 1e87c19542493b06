//! Chat history entries shown alongside the gallery.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vidgen_core::types::{DbId, Timestamp};

/// Message authored by the user (their prompt).
pub const KIND_USER: &str = "user";

/// Message authored by the service (acknowledgements).
pub const KIND_ASSISTANT: &str = "assistant";

/// A row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub content: String,
    pub video_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatMessage {
    pub user_id: DbId,
    pub kind: String,
    pub content: String,
    pub video_id: Option<DbId>,
}
