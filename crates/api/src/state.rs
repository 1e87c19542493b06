use std::sync::Arc;

use vidgen_core::generation::VideoGenerator;
use vidgen_core::lifecycle::VideoStore;
use vidgen_veo::GeneratorInfo;

use crate::background::StatusPoller;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vidgen_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for video lifecycle events.
    pub event_bus: Arc<vidgen_events::EventBus>,
    /// Job store the lifecycle writes through.
    pub store: Arc<dyn VideoStore>,
    /// Remote video generator client.
    pub generator: Arc<dyn VideoGenerator>,
    /// Single-flight status poller shared by the background loop and the
    /// admin trigger.
    pub poller: Arc<StatusPoller>,
    /// Masked generator settings for diagnostics.
    pub generator_info: Arc<GeneratorInfo>,
}
