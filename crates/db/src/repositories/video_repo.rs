//! Repository for the `videos` table.
//!
//! Terminal transitions are conditional on the row not already being
//! completed or failed, so a job settles exactly once.

use sqlx::PgPool;
use vidgen_core::status::{StatusId, VideoStatus, TERMINAL_VIDEO_STATUSES};
use vidgen_core::types::{DbId, Timestamp};

use crate::models::video::Video;

/// Column list for `videos` queries.
const COLUMNS: &str = "\
    id, user_id, title, prompt, status_id, \
    operation_name, video_uri, error_message, \
    completed_at, created_at, updated_at";

/// Maximum page size for video listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for video listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides lifecycle writes and gallery reads for video jobs.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new job in `generating`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        title: &str,
        prompt: &str,
    ) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (user_id, title, prompt, status_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(user_id)
            .bind(title)
            .bind(prompt)
            .bind(VideoStatus::Generating.id())
            .fetch_one(pool)
            .await
    }

    /// Record the operation handle and move a `generating` job to `processing`.
    ///
    /// Returns `false` if the job is not in `generating`.
    pub async fn set_processing(
        pool: &PgPool,
        id: DbId,
        operation_name: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos SET status_id = $2, operation_name = $3 \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(VideoStatus::Processing.id())
        .bind(operation_name)
        .bind(VideoStatus::Generating.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a non-terminal job completed with its result URI.
    ///
    /// Returns `false` if the job was already completed or failed.
    pub async fn complete(pool: &PgPool, id: DbId, video_uri: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos \
             SET status_id = $2, video_uri = $3, completed_at = NOW() \
             WHERE id = $1 AND status_id NOT IN ($4, $5)",
        )
        .bind(id)
        .bind(VideoStatus::Completed.id())
        .bind(video_uri)
        .bind(TERMINAL_VIDEO_STATUSES[0])
        .bind(TERMINAL_VIDEO_STATUSES[1])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a non-terminal job failed with an error message.
    ///
    /// Returns `false` if the job was already completed or failed.
    pub async fn fail(pool: &PgPool, id: DbId, error_message: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos \
             SET status_id = $2, error_message = $3, completed_at = NOW() \
             WHERE id = $1 AND status_id NOT IN ($4, $5)",
        )
        .bind(id)
        .bind(VideoStatus::Failed.id())
        .bind(error_message)
        .bind(TERMINAL_VIDEO_STATUSES[0])
        .bind(TERMINAL_VIDEO_STATUSES[1])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a job by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's jobs, newest first, with optional status filter and
    /// pagination.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        status_id: Option<StatusId>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);

        let query = if status_id.is_some() {
            format!(
                "SELECT {COLUMNS} FROM videos \
                 WHERE user_id = $1 AND status_id = $2 \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $3 OFFSET $4"
            )
        } else {
            format!(
                "SELECT {COLUMNS} FROM videos \
                 WHERE user_id = $1 \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $2 OFFSET $3"
            )
        };

        let mut q = sqlx::query_as::<_, Video>(&query).bind(user_id);
        if let Some(sid) = status_id {
            q = q.bind(sid);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Jobs in `processing` with an operation handle, created at or after
    /// `created_after`, oldest first.
    pub async fn list_processing_since(
        pool: &PgPool,
        created_after: Timestamp,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos \
             WHERE status_id = $1 \
               AND operation_name IS NOT NULL \
               AND created_at >= $2 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(VideoStatus::Processing.id())
            .bind(created_after)
            .fetch_all(pool)
            .await
    }
}
