//! Route definitions for the `/videos` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// GET    /          -> list_videos
/// POST   /          -> create_video
/// POST   /poll      -> poll_videos (admin)
/// GET    /{id}      -> get_video
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route("/poll", post(videos::poll_videos))
        .route("/{id}", get(videos::get_video))
}
