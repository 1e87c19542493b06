pub mod admin;
pub mod auth;
pub mod chat;
pub mod health;
pub mod user;
pub mod videos;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws?token=                 WebSocket push channel (auth via query token)
///
/// /auth/register             create account (public)
/// /auth/login                login (public)
///
/// /videos                    list, submit
/// /videos/{id}               get (owner or admin)
/// /videos/poll               run one status pass (admin only)
///
/// /chat/messages             chat history
///
/// /user/preferences          get, update
///
/// /admin/generator           generator settings, key masked (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/videos", videos::router())
        .nest("/chat", chat::router())
        .nest("/user", user::router())
        .nest("/admin", admin::router())
}
