//! Persistence seam for video jobs.

use async_trait::async_trait;

use crate::types::{DbId, Timestamp};

/// Error type returned by [`VideoStore`] implementations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// A processing job eligible for a status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollCandidate {
    pub video_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub operation_handle: String,
}

/// Writes and queries the lifecycle needs from the job table.
///
/// Terminal transitions (`mark_completed`, `mark_failed`) must be
/// conditional: they only apply to a job that is not already completed or
/// failed, and report whether a row changed.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a job in `generating` state and return its id.
    async fn create_generating(
        &self,
        user_id: DbId,
        title: &str,
        prompt: &str,
    ) -> Result<DbId, StoreError>;

    /// Record the operation handle and move a `generating` job to
    /// `processing`. Returns `false` if the job was not in `generating`.
    async fn mark_processing(
        &self,
        video_id: DbId,
        operation_handle: &str,
    ) -> Result<bool, StoreError>;

    /// Move a non-terminal job to `completed` with its result URI.
    async fn mark_completed(&self, video_id: DbId, result_uri: &str) -> Result<bool, StoreError>;

    /// Move a non-terminal job to `failed` with an error detail.
    async fn mark_failed(&self, video_id: DbId, error_detail: &str) -> Result<bool, StoreError>;

    /// Jobs in `processing` with a handle, created at or after `created_after`.
    async fn list_pollable(&self, created_after: Timestamp)
        -> Result<Vec<PollCandidate>, StoreError>;
}
