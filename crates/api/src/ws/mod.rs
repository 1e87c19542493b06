//! WebSocket push channel.
//!
//! Authenticated clients connect to `/api/v1/ws?token=<jwt>` and receive
//! JSON updates for their own video jobs.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
