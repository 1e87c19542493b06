//! Event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vidgen_core::lifecycle::{PollOutcome, PollResult};
use vidgen_core::types::DbId;

/// Dot-separated event names.
pub mod event_types {
    pub const VIDEO_SUBMITTED: &str = "video.submitted";
    pub const VIDEO_COMPLETED: &str = "video.completed";
    pub const VIDEO_FAILED: &str = "video.failed";
}

// ---------------------------------------------------------------------------
// VideoEvent
// ---------------------------------------------------------------------------

/// A change to a video job, addressed to the job's owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEvent {
    /// One of [`event_types`].
    pub event_type: String,
    pub video_id: DbId,
    /// Owner of the job; the only user the event is delivered to.
    pub user_id: DbId,
    /// Event-specific data (title, status, result URI or error).
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl VideoEvent {
    pub fn new(
        event_type: impl Into<String>,
        video_id: DbId,
        user_id: DbId,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            video_id,
            user_id,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// A submission reached `processing`.
    pub fn submitted(video_id: DbId, user_id: DbId, title: &str) -> Self {
        Self::new(
            event_types::VIDEO_SUBMITTED,
            video_id,
            user_id,
            serde_json::json!({ "title": title, "status": "processing" }),
        )
    }

    /// A submission failed immediately and its job was marked failed.
    pub fn submission_failed(video_id: DbId, user_id: DbId, title: &str, error: &str) -> Self {
        Self::new(
            event_types::VIDEO_FAILED,
            video_id,
            user_id,
            serde_json::json!({ "title": title, "status": "failed", "error": error }),
        )
    }

    /// Event for a terminal poll result. Non-terminal outcomes produce none.
    pub fn from_poll_result(result: &PollResult) -> Option<Self> {
        let (event_type, payload) = match &result.outcome {
            PollOutcome::Completed { video_uri } => (
                event_types::VIDEO_COMPLETED,
                serde_json::json!({
                    "title": result.title,
                    "status": "completed",
                    "video_uri": video_uri,
                }),
            ),
            PollOutcome::Failed { error } => (
                event_types::VIDEO_FAILED,
                serde_json::json!({
                    "title": result.title,
                    "status": "failed",
                    "error": error,
                }),
            ),
            PollOutcome::Processing | PollOutcome::CheckError { .. } => return None,
        };
        Some(Self::new(event_type, result.video_id, result.user_id, payload))
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use vidgen_events::bus::{EventBus, VideoEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(VideoEvent::submitted(1, 7, "Title A"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<VideoEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: VideoEvent) {
        tracing::debug!(
            event_type = %event.event_type,
            video_id = event.video_id,
            user_id = event.user_id,
            "Publishing video event",
        );
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<VideoEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_result(outcome: PollOutcome) -> PollResult {
        PollResult {
            video_id: 5,
            user_id: 9,
            title: "Title A".into(),
            outcome,
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(VideoEvent::submitted(1, 7, "Title A"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1.event_type, event_types::VIDEO_SUBMITTED);
        assert_eq!(e2.video_id, 1);
        assert_eq!(e2.user_id, 7);
        assert_eq!(e2.payload["title"], "Title A");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(VideoEvent::submitted(1, 7, "orphan"));
    }

    #[test]
    fn completed_poll_result_becomes_completed_event() {
        let event = VideoEvent::from_poll_result(&poll_result(PollOutcome::Completed {
            video_uri: "https://cdn/v1.mp4".into(),
        }))
        .unwrap();

        assert_eq!(event.event_type, event_types::VIDEO_COMPLETED);
        assert_eq!(event.video_id, 5);
        assert_eq!(event.user_id, 9);
        assert_eq!(event.payload["video_uri"], "https://cdn/v1.mp4");
    }

    #[test]
    fn failed_poll_result_carries_error() {
        let event = VideoEvent::from_poll_result(&poll_result(PollOutcome::Failed {
            error: "content policy violation".into(),
        }))
        .unwrap();

        assert_eq!(event.event_type, event_types::VIDEO_FAILED);
        assert_eq!(event.payload["error"], "content policy violation");
    }

    #[test]
    fn non_terminal_poll_results_produce_no_event() {
        assert!(VideoEvent::from_poll_result(&poll_result(PollOutcome::Processing)).is_none());
        assert!(VideoEvent::from_poll_result(&poll_result(PollOutcome::CheckError {
            error: "timeout".into(),
        }))
        .is_none());
    }
}
