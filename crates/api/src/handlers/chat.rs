//! Handlers for the `/chat` resource.

use axum::extract::State;
use axum::Json;
use vidgen_db::models::chat_message::ChatMessage;
use vidgen_db::repositories::ChatMessageRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/chat/messages
///
/// The caller's latest 50 messages, oldest first.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ChatMessage>>>> {
    let messages = ChatMessageRepo::list_recent(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: messages }))
}
