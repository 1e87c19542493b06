//! Event-to-WebSocket routing.
//!
//! [`NotificationRouter`] subscribes to the event bus and pushes each video
//! event to the job owner's open connections. Delivery is fire-and-forget:
//! an owner without a connection simply misses the push and sees the new
//! state on the next read.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use vidgen_events::VideoEvent;

use crate::ws::WsManager;

pub struct NotificationRouter {
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the routing loop until the event bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<VideoEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Push one event to its owner. Returns the number of connections reached.
    pub async fn deliver(&self, event: &VideoEvent) -> usize {
        let msg = serde_json::json!({
            "type": "video_update",
            "event_type": event.event_type,
            "video_id": event.video_id,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });
        let delivered = self
            .ws_manager
            .send_to_user(event.user_id, Message::Text(msg.to_string().into()))
            .await;

        tracing::debug!(
            event_type = %event.event_type,
            video_id = event.video_id,
            user_id = event.user_id,
            delivered,
            "Video event routed"
        );
        delivered
    }
}
