//! Delivery of video lifecycle events to connected clients.

pub mod router;

pub use router::NotificationRouter;
