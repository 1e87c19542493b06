//! [`VideoStore`] over PostgreSQL.

use async_trait::async_trait;
use vidgen_core::lifecycle::{PollCandidate, StoreError, VideoStore};
use vidgen_core::types::{DbId, Timestamp};

use crate::repositories::VideoRepo;
use crate::DbPool;

/// Job store backed by the `videos` table.
#[derive(Debug, Clone)]
pub struct PgVideoStore {
    pool: DbPool,
}

impl PgVideoStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn create_generating(
        &self,
        user_id: DbId,
        title: &str,
        prompt: &str,
    ) -> Result<DbId, StoreError> {
        let video = VideoRepo::create(&self.pool, user_id, title, prompt).await?;
        Ok(video.id)
    }

    async fn mark_processing(
        &self,
        video_id: DbId,
        operation_handle: &str,
    ) -> Result<bool, StoreError> {
        Ok(VideoRepo::set_processing(&self.pool, video_id, operation_handle).await?)
    }

    async fn mark_completed(&self, video_id: DbId, result_uri: &str) -> Result<bool, StoreError> {
        Ok(VideoRepo::complete(&self.pool, video_id, result_uri).await?)
    }

    async fn mark_failed(&self, video_id: DbId, error_detail: &str) -> Result<bool, StoreError> {
        Ok(VideoRepo::fail(&self.pool, video_id, error_detail).await?)
    }

    async fn list_pollable(
        &self,
        created_after: Timestamp,
    ) -> Result<Vec<PollCandidate>, StoreError> {
        let videos = VideoRepo::list_processing_since(&self.pool, created_after).await?;
        Ok(videos
            .into_iter()
            .filter_map(|v| {
                v.operation_name.map(|operation_handle| PollCandidate {
                    video_id: v.id,
                    user_id: v.user_id,
                    title: v.title,
                    operation_handle,
                })
            })
            .collect())
    }
}
