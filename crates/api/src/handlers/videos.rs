//! Handlers for the `/videos` resource.
//!
//! Submission runs the job lifecycle through the shared [`VideoStore`] and
//! [`VideoGenerator`]; reads go straight to the repository. Chat history,
//! the per-user counter and push events are side effects of a submission
//! and never change its outcome.
//!
//! [`VideoStore`]: vidgen_core::lifecycle::VideoStore
//! [`VideoGenerator`]: vidgen_core::generation::VideoGenerator

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vidgen_core::error::CoreError;
use vidgen_core::lifecycle::{submit_video, SubmissionError, SubmissionOutcome, SubmitVideo};
use vidgen_core::status::VideoStatus;
use vidgen_core::types::DbId;
use vidgen_db::models::chat_message::{CreateChatMessage, KIND_ASSISTANT, KIND_USER};
use vidgen_db::models::video::{CreateVideoRequest, Video, VideoListQuery, VideoResponse};
use vidgen_db::repositories::{ChatMessageRepo, UserPreferenceRepo, VideoRepo};
use vidgen_events::VideoEvent;

use crate::background::PollPassError;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Assistant reply recorded after a successful submission.
pub const SUBMITTED_ACK: &str =
    "Your video is being generated. It will appear in your gallery when it is ready.";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a video by ID and verify the caller owns it (or is admin).
async fn find_and_authorize(
    pool: &sqlx::PgPool,
    video_id: DbId,
    auth: &AuthUser,
) -> AppResult<Video> {
    let video = VideoRepo::find_by_id(pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    if video.user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot view another user's video".into(),
        )));
    }

    Ok(video)
}

/// Style to decorate the generator prompt with, if enhancement is on and
/// the user has one. Lookup failures fall back to no style.
async fn preferred_style(state: &AppState, user_id: DbId) -> Option<String> {
    if !state.config.prompt_style_enhancement {
        return None;
    }
    match UserPreferenceRepo::find_by_user(&state.pool, user_id).await {
        Ok(pref) => pref.and_then(|p| p.preferred_style),
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Failed to load preferred style");
            None
        }
    }
}

async fn record_chat(
    state: &AppState,
    user_id: DbId,
    kind: &str,
    content: &str,
    video_id: DbId,
) {
    let input = CreateChatMessage {
        user_id,
        kind: kind.to_string(),
        content: content.to_string(),
        video_id: Some(video_id),
    };
    if let Err(e) = ChatMessageRepo::create(&state.pool, &input).await {
        tracing::warn!(user_id, video_id, kind, error = %e, "Failed to record chat message");
    }
}

/// Chat history, counter and event for an accepted submission.
async fn after_accepted(state: &AppState, user_id: DbId, prompt: &str, title: &str, video_id: DbId) {
    record_chat(state, user_id, KIND_USER, prompt, video_id).await;
    record_chat(state, user_id, KIND_ASSISTANT, SUBMITTED_ACK, video_id).await;

    if let Err(e) = UserPreferenceRepo::increment_total_videos(&state.pool, user_id).await {
        tracing::warn!(user_id, error = %e, "Failed to increment video counter");
    }

    state
        .event_bus
        .publish(VideoEvent::submitted(video_id, user_id, title));
}

/// Chat history and event for a submission that left a failed job behind.
async fn after_rejected(
    state: &AppState,
    user_id: DbId,
    prompt: &str,
    title: &str,
    err: &SubmissionError,
) {
    let Some(video_id) = err.video_id() else {
        return;
    };
    record_chat(state, user_id, KIND_USER, prompt, video_id).await;

    let detail = match err {
        SubmissionError::RemoteStart { error, .. } => error.job_detail(),
        other => other.to_string(),
    };
    state.event_bus.publish(VideoEvent::submission_failed(
        video_id, user_id, title, &detail,
    ));
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/videos
///
/// Create a job and start remote generation. Returns 201 with
/// `{video_id, status: "processing", operation_handle}` as soon as the
/// remote operation has started; completion is picked up by the poller.
///
/// The submission runs on its own task. A request dropped by the timeout
/// layer or a client disconnect still leaves the job `processing` or
/// `failed`, never `generating`.
pub async fn create_video(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateVideoRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = auth.user_id;
    let outcome = tokio::spawn(run_submission(state, user_id, input))
        .await
        .map_err(|e| {
            tracing::error!(user_id, error = %e, "Submission task did not finish");
            AppError::InternalError("Submission task did not finish".into())
        })??;

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// Submission lifecycle plus its chat, counter and event side effects.
async fn run_submission(
    state: AppState,
    user_id: DbId,
    input: CreateVideoRequest,
) -> AppResult<SubmissionOutcome> {
    let style = preferred_style(&state, user_id).await;

    let result = submit_video(
        state.store.as_ref(),
        state.generator.as_ref(),
        SubmitVideo {
            user_id,
            title: &input.title,
            prompt: &input.prompt,
            preferred_style: style.as_deref(),
        },
    )
    .await;

    let prompt = input.prompt.trim();
    let title = input.title.trim();

    match result {
        Ok(outcome) => {
            after_accepted(&state, user_id, prompt, title, outcome.video_id).await;
            Ok(outcome)
        }
        Err(err) => {
            after_rejected(&state, user_id, prompt, title, &err).await;
            Err(err.into())
        }
    }
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/videos
///
/// The caller's videos, newest first. Optional `status`, `limit` and
/// `offset` query parameters; an unknown status name is a 400.
pub async fn list_videos(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<VideoListQuery>,
) -> AppResult<impl IntoResponse> {
    let status_id = match params.status.as_deref() {
        None => None,
        Some(name) => Some(
            VideoStatus::from_name(name)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{name}'")))?
                .id(),
        ),
    };

    let videos = VideoRepo::list_by_user(
        &state.pool,
        auth.user_id,
        status_id,
        params.limit,
        params.offset,
    )
    .await?;

    let data: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/videos/{id}
///
/// Owner or admin only: 404 if missing, 403 for anyone else.
pub async fn get_video(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = find_and_authorize(&state.pool, video_id, &auth).await?;
    Ok(Json(DataResponse {
        data: VideoResponse::from(video),
    }))
}

// ---------------------------------------------------------------------------
// Poll
// ---------------------------------------------------------------------------

/// POST /api/v1/videos/poll
///
/// Run one status pass now and return its summary. 409 if a pass is
/// already in flight in this process.
pub async fn poll_videos(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(user_id = admin.user_id, "Manual status poll requested");

    let summary = state.poller.try_run_once().await.map_err(|e| match e {
        PollPassError::AlreadyRunning => AppError::Core(CoreError::Conflict(e.to_string())),
        PollPassError::Poll(inner) => AppError::InternalError(inner.to_string()),
    })?;

    Ok(Json(DataResponse { data: summary }))
}
