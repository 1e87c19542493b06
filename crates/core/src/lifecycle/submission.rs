//! Job submission: create the job, start the remote operation, record the
//! handle.
//!
//! The call returns as soon as the remote operation has been started;
//! generation itself is observed later by the poller. Nothing here is
//! retried. A failed submission leaves a `failed` job behind and a new
//! submission creates a new job.

use serde::Serialize;

use crate::error::CoreError;
use crate::generation::{GeneratorError, VideoGenerator};
use crate::prompt::{compose_generation_prompt, validate_submission};
use crate::status::VideoStatus;
use crate::types::DbId;

use super::store::{StoreError, VideoStore};

/// Error detail stored when the API answers without an operation handle.
pub const MISSING_HANDLE_DETAIL: &str = "missing operation handle";

/// Error detail stored when the operation handle could not be persisted.
pub const SAVE_HANDLE_FAILED_DETAIL: &str = "failed to save operation handle";

/// Input for [`submit_video`]. `title` and `prompt` are raw user text.
#[derive(Debug, Clone, Copy)]
pub struct SubmitVideo<'a> {
    pub user_id: DbId,
    pub title: &'a str,
    pub prompt: &'a str,
    /// Style appended to the text sent to the generator. Not stored.
    pub preferred_style: Option<&'a str>,
}

/// A submission whose remote operation was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub video_id: DbId,
    pub status: VideoStatus,
    pub operation_handle: String,
}

/// Why a submission did not reach `processing`.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Title or prompt rejected; no job was created.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// A job-store write failed. `video_id` is `None` when the job row itself
    /// could not be created.
    #[error("Failed to persist video job: {error}")]
    Persistence {
        video_id: Option<DbId>,
        error: StoreError,
    },

    /// The generator call failed; the job was marked failed.
    #[error("Video generation failed to start: {error}")]
    RemoteStart {
        video_id: DbId,
        error: GeneratorError,
    },

    /// The generator answered without an operation handle; the job was
    /// marked failed.
    #[error("Video generator returned no operation handle")]
    MissingHandle { video_id: DbId },
}

impl SubmissionError {
    /// Id of the job left behind by the failed submission, if one was created.
    pub fn video_id(&self) -> Option<DbId> {
        match self {
            Self::Invalid(_) => None,
            Self::Persistence { video_id, .. } => *video_id,
            Self::RemoteStart { video_id, .. } | Self::MissingHandle { video_id } => {
                Some(*video_id)
            }
        }
    }
}

/// Submit a video generation request.
///
/// 1. Validate and trim title and prompt.
/// 2. Create the job in `generating`.
/// 3. Start the remote operation.
/// 4. Record the handle and move the job to `processing`.
///
/// Any failure after step 2 marks the job `failed` before returning.
pub async fn submit_video(
    store: &dyn VideoStore,
    generator: &dyn VideoGenerator,
    request: SubmitVideo<'_>,
) -> Result<SubmissionOutcome, SubmissionError> {
    let validated = validate_submission(request.title, request.prompt)?;

    let video_id = store
        .create_generating(request.user_id, &validated.title, &validated.prompt)
        .await
        .map_err(|error| SubmissionError::Persistence {
            video_id: None,
            error,
        })?;

    tracing::info!(video_id, user_id = request.user_id, "Video job created");

    let generation_prompt = compose_generation_prompt(&validated.prompt, request.preferred_style);

    let started = match generator.start(&generation_prompt).await {
        Ok(started) => started,
        Err(error) => {
            tracing::error!(video_id, error = %error, "Video generator rejected start request");
            fail_job(store, video_id, &error.job_detail()).await;
            return Err(SubmissionError::RemoteStart { video_id, error });
        }
    };

    let Some(handle) = started
        .operation_handle
        .filter(|handle| !handle.trim().is_empty())
    else {
        tracing::error!(video_id, "Video generator response had no operation handle");
        fail_job(store, video_id, MISSING_HANDLE_DETAIL).await;
        return Err(SubmissionError::MissingHandle { video_id });
    };

    let recorded = match store.mark_processing(video_id, &handle).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(StoreError::from(format!(
            "video {video_id} left the generating state before its handle was saved"
        ))),
        Err(error) => Err(error),
    };

    if let Err(error) = recorded {
        tracing::error!(
            video_id,
            operation_name = %handle,
            error = %error,
            "Failed to save operation handle",
        );
        fail_job(store, video_id, SAVE_HANDLE_FAILED_DETAIL).await;
        return Err(SubmissionError::Persistence {
            video_id: Some(video_id),
            error,
        });
    }

    tracing::info!(video_id, operation_name = %handle, "Video generation started");

    Ok(SubmissionOutcome {
        video_id,
        status: VideoStatus::Processing,
        operation_handle: handle,
    })
}

/// Best-effort transition to `failed`; a store error here is only logged.
async fn fail_job(store: &dyn VideoStore, video_id: DbId, detail: &str) {
    if let Err(e) = store.mark_failed(video_id, detail).await {
        tracing::error!(video_id, error = %e, "Failed to mark video job as failed");
    }
}
