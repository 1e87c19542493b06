//! Repository for the `user_preferences` table.
//!
//! Rows are created lazily: reads return `None` until the first write, and
//! every write is an upsert keyed on `user_id`.

use sqlx::PgPool;
use vidgen_core::types::DbId;

use crate::models::user_preference::{UpdateUserPreference, UserPreference};

const COLUMNS: &str = "id, user_id, preferred_style, analysis_summary, total_videos, \
                        created_at, updated_at";

pub struct UserPreferenceRepo;

impl UserPreferenceRepo {
    /// Find the preferences row for a user.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPreference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply non-`None` fields, creating the row if needed.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateUserPreference,
    ) -> Result<UserPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences (user_id, preferred_style, analysis_summary) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_user_preferences_user_id DO UPDATE SET \
                 preferred_style = COALESCE(EXCLUDED.preferred_style, user_preferences.preferred_style), \
                 analysis_summary = COALESCE(EXCLUDED.analysis_summary, user_preferences.analysis_summary) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .bind(&input.preferred_style)
            .bind(&input.analysis_summary)
            .fetch_one(pool)
            .await
    }

    /// Increment `total_videos` by one, creating the row if needed.
    pub async fn increment_total_videos(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_preferences (user_id, total_videos) VALUES ($1, 1) \
             ON CONFLICT ON CONSTRAINT uq_user_preferences_user_id DO UPDATE SET \
                 total_videos = user_preferences.total_videos + 1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
