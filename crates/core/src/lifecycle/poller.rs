//! Status poller: one pass over in-flight jobs.
//!
//! A pass selects `processing` jobs created inside the recency window,
//! checks each remote operation independently and applies the terminal
//! transition it reports. A failed check never touches the job; it is
//! reported in the summary and the job is checked again on the next pass.
//! Scheduling passes is the caller's business.

use chrono::Duration;
use futures::StreamExt;
use serde::Serialize;

use crate::generation::{OperationStatus, VideoGenerator};
use crate::types::{DbId, Timestamp};

use super::store::{PollCandidate, StoreError, VideoStore};

/// Error detail for an operation that finished with neither artifact nor error.
pub const NO_RESULT_DETAIL: &str = "completed with no result";

/// Error detail for an error payload without a message.
pub const UNKNOWN_ERROR_DETAIL: &str = "Unknown error";

/// Default maximum age of a job still eligible for polling.
pub const DEFAULT_RECENCY_WINDOW_MINS: i64 = 120;

/// Largest accepted recency window (30 days).
pub const MAX_RECENCY_WINDOW_MINS: i64 = 30 * 24 * 60;

/// Default number of status checks in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Tunables for a poll pass.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Jobs created longer ago than this are skipped.
    pub recency_window: Duration,
    /// Upper bound on concurrent status checks.
    pub concurrency: usize,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            recency_window: Duration::minutes(DEFAULT_RECENCY_WINDOW_MINS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Recency window of `mins` minutes, or `None` outside
/// `1..=MAX_RECENCY_WINDOW_MINS`.
pub fn recency_window_minutes(mins: i64) -> Option<Duration> {
    if !(1..=MAX_RECENCY_WINDOW_MINS).contains(&mins) {
        return None;
    }
    Duration::try_minutes(mins)
}

/// What a pass did with one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollOutcome {
    /// Job moved to `completed`.
    Completed { video_uri: String },
    /// Job moved to `failed`.
    Failed { error: String },
    /// Remote operation still running; job unchanged.
    Processing,
    /// Check (or recording its result) failed; job unchanged.
    CheckError { error: String },
}

/// Per-job entry of a [`PollSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollResult {
    pub video_id: DbId,
    pub user_id: DbId,
    pub title: String,
    #[serde(flatten)]
    pub outcome: PollOutcome,
}

/// Result of one poll pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub checked: usize,
    pub completed: usize,
    pub failed: usize,
    pub processing: usize,
    pub check_errors: usize,
    pub results: Vec<PollResult>,
}

impl PollSummary {
    fn from_results(results: Vec<PollResult>) -> Self {
        let mut summary = Self {
            checked: results.len(),
            ..Self::default()
        };
        for result in &results {
            match result.outcome {
                PollOutcome::Completed { .. } => summary.completed += 1,
                PollOutcome::Failed { .. } => summary.failed += 1,
                PollOutcome::Processing => summary.processing += 1,
                PollOutcome::CheckError { .. } => summary.check_errors += 1,
            }
        }
        summary.results = results;
        summary
    }
}

/// A pass that could not start.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Failed to select videos to poll: {0}")]
    Selection(StoreError),

    #[error("Recency window {window} reaches before the earliest representable time")]
    WindowOutOfRange { window: Duration },
}

/// Terminal state (if any) implied by an operation snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    Running,
    Completed(String),
    Failed(String),
}

fn resolve(status: &OperationStatus) -> Resolution {
    if !status.done {
        return Resolution::Running;
    }
    if let Some(uri) = status.result_uri.as_deref().filter(|u| !u.is_empty()) {
        return Resolution::Completed(uri.to_string());
    }
    if let Some(error) = &status.error {
        let detail = error
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(UNKNOWN_ERROR_DETAIL);
        return Resolution::Failed(detail.to_string());
    }
    Resolution::Failed(NO_RESULT_DETAIL.to_string())
}

/// Run one poll pass as of `now`.
pub async fn poll_once(
    store: &dyn VideoStore,
    generator: &dyn VideoGenerator,
    options: PollOptions,
    now: Timestamp,
) -> Result<PollSummary, PollError> {
    let created_after = now
        .checked_sub_signed(options.recency_window)
        .ok_or(PollError::WindowOutOfRange {
            window: options.recency_window,
        })?;
    let candidates = store
        .list_pollable(created_after)
        .await
        .map_err(PollError::Selection)?;

    if candidates.is_empty() {
        tracing::debug!("No processing videos to poll");
        return Ok(PollSummary::default());
    }

    tracing::info!(count = candidates.len(), "Polling processing videos");

    let results: Vec<PollResult> = futures::stream::iter(candidates)
        .map(|candidate| poll_candidate(store, generator, candidate))
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;

    let summary = PollSummary::from_results(results);
    tracing::info!(
        checked = summary.checked,
        completed = summary.completed,
        failed = summary.failed,
        processing = summary.processing,
        check_errors = summary.check_errors,
        "Poll pass finished",
    );
    Ok(summary)
}

async fn poll_candidate(
    store: &dyn VideoStore,
    generator: &dyn VideoGenerator,
    candidate: PollCandidate,
) -> PollResult {
    let video_id = candidate.video_id;
    let outcome = match generator.check(&candidate.operation_handle).await {
        Err(e) => {
            tracing::warn!(
                video_id,
                operation_name = %candidate.operation_handle,
                error = %e,
                "Status check failed",
            );
            PollOutcome::CheckError {
                error: e.to_string(),
            }
        }
        Ok(status) => match resolve(&status) {
            Resolution::Running => {
                tracing::debug!(video_id, "Video still processing");
                PollOutcome::Processing
            }
            Resolution::Completed(uri) => {
                match store.mark_completed(video_id, &uri).await {
                    Ok(applied) => {
                        log_transition(video_id, applied, "completed");
                        PollOutcome::Completed { video_uri: uri }
                    }
                    Err(e) => record_failure(video_id, e),
                }
            }
            Resolution::Failed(detail) => match store.mark_failed(video_id, &detail).await {
                Ok(applied) => {
                    log_transition(video_id, applied, "failed");
                    PollOutcome::Failed { error: detail }
                }
                Err(e) => record_failure(video_id, e),
            },
        },
    };

    PollResult {
        video_id,
        user_id: candidate.user_id,
        title: candidate.title,
        outcome,
    }
}

fn log_transition(video_id: DbId, applied: bool, status: &str) {
    if applied {
        tracing::info!(video_id, status, "Video reached terminal state");
    } else {
        tracing::debug!(video_id, status, "Video was already terminal");
    }
}

fn record_failure(video_id: DbId, e: StoreError) -> PollOutcome {
    tracing::error!(video_id, error = %e, "Failed to record poll result");
    PollOutcome::CheckError {
        error: format!("Failed to record result: {e}"),
    }
}
