use axum::routing::get;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// GET /messages -> list_messages
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/messages", get(chat::list_messages))
}
