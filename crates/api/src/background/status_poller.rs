//! Status poller shared by the background loop and the admin trigger.
//!
//! Only one pass runs at a time in this process. A pass that finds another
//! one in flight returns [`PollPassError::AlreadyRunning`] instead of
//! waiting.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use vidgen_core::generation::VideoGenerator;
use vidgen_core::lifecycle::{poll_once, PollError, PollOptions, PollSummary, VideoStore};
use vidgen_events::{EventBus, VideoEvent};

/// Why a pass did not run to completion.
#[derive(Debug, thiserror::Error)]
pub enum PollPassError {
    #[error("A poll pass is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Poll(#[from] PollError),
}

pub struct StatusPoller {
    store: Arc<dyn VideoStore>,
    generator: Arc<dyn VideoGenerator>,
    event_bus: Arc<EventBus>,
    options: PollOptions,
    guard: Mutex<()>,
}

impl StatusPoller {
    pub fn new(
        store: Arc<dyn VideoStore>,
        generator: Arc<dyn VideoGenerator>,
        event_bus: Arc<EventBus>,
        options: PollOptions,
    ) -> Self {
        Self {
            store,
            generator,
            event_bus,
            options,
            guard: Mutex::new(()),
        }
    }

    /// Run one pass unless another is in flight, then publish an event for
    /// every terminal transition it applied.
    pub async fn try_run_once(&self) -> Result<PollSummary, PollPassError> {
        let _pass = self
            .guard
            .try_lock()
            .map_err(|_| PollPassError::AlreadyRunning)?;

        let summary = poll_once(
            self.store.as_ref(),
            self.generator.as_ref(),
            self.options,
            Utc::now(),
        )
        .await?;

        for event in summary.results.iter().filter_map(VideoEvent::from_poll_result) {
            self.event_bus.publish(event);
        }

        Ok(summary)
    }

    /// Run passes every `interval` until `cancel` is triggered.
    pub async fn run(self: Arc<Self>, interval: Duration, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = interval.as_secs(),
            recency_window_mins = self.options.recency_window.num_minutes(),
            concurrency = self.options.concurrency,
            "Status poller started"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Status poller stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.try_run_once().await {
                        Ok(summary) if summary.checked > 0 => {
                            tracing::info!(
                                checked = summary.checked,
                                completed = summary.completed,
                                failed = summary.failed,
                                processing = summary.processing,
                                check_errors = summary.check_errors,
                                "Status poll pass finished"
                            );
                        }
                        Ok(_) => tracing::debug!("Status poll: no videos in flight"),
                        Err(PollPassError::AlreadyRunning) => {
                            tracing::debug!("Status poll skipped: pass already running");
                        }
                        Err(e) => tracing::error!(error = %e, "Status poll pass failed"),
                    }
                }
            }
        }
    }
}
