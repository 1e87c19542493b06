//! Domain errors shared by the lifecycle and the HTTP layer.
//!
//! Infrastructure failures (database, generator transport) have their own
//! error types and are mapped at the API boundary.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A video, user or other row that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Rejected user input: empty prompt, overlong title, weak password.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not the owner or an admin.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}
