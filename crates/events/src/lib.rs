//! In-process event bus for video job updates.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`VideoEvent`]: the event envelope, addressed to the job's owner.
//!
//! Delivery is best-effort. Subscribers that fall behind lose events; the
//! job table stays the source of truth.

pub mod bus;

pub use bus::{event_types, EventBus, VideoEvent};
