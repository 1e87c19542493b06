//! Per-user preferences and generation stats.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vidgen_core::types::{DbId, Timestamp};

/// A row from the `user_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreference {
    pub id: DbId,
    pub user_id: DbId,
    pub preferred_style: Option<String>,
    pub analysis_summary: Option<String>,
    pub total_videos: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body for `PUT /api/v1/user/preferences`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserPreference {
    pub preferred_style: Option<String>,
    pub analysis_summary: Option<String>,
}
