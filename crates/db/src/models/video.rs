//! Video job entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vidgen_core::status::{StatusId, VideoStatus};
use vidgen_core::types::{DbId, Timestamp};

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow)]
pub struct Video {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub prompt: String,
    pub status_id: StatusId,
    pub operation_name: Option<String>,
    pub video_uri: Option<String>,
    pub error_message: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    /// Resolved status, `None` if the row carries an id this build does not know.
    pub fn status(&self) -> Option<VideoStatus> {
        VideoStatus::from_id(self.status_id)
    }
}

/// API representation of a video job, with the status resolved to its name.
#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub prompt: String,
    pub status: &'static str,
    pub status_id: StatusId,
    pub operation_name: Option<String>,
    pub video_uri: Option<String>,
    pub error_message: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Video> for VideoResponse {
    fn from(v: Video) -> Self {
        let status = v.status().map_or("unknown", VideoStatus::as_str);
        Self {
            id: v.id,
            user_id: v.user_id,
            title: v.title,
            prompt: v.prompt,
            status,
            status_id: v.status_id,
            operation_name: v.operation_name,
            video_uri: v.video_uri,
            error_message: v.error_message,
            completed_at: v.completed_at,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

/// Request body for `POST /api/v1/videos`.
#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub prompt: String,
}

/// Query parameters for `GET /api/v1/videos`.
#[derive(Debug, Default, Deserialize)]
pub struct VideoListQuery {
    /// Filter by status name (`generating`, `processing`, `completed`, `failed`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
