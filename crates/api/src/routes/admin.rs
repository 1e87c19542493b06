//! Route definitions for `/admin`. Every handler requires [`RequireAdmin`].
//!
//! [`RequireAdmin`]: crate::middleware::rbac::RequireAdmin

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /generator -> get_generator_info
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generator", get(admin::get_generator_info))
}
