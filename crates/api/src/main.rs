use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidgen_api::background::StatusPoller;
use vidgen_api::config::ServerConfig;
use vidgen_api::notifications::NotificationRouter;
use vidgen_api::router::build_app_router;
use vidgen_api::state::AppState;
use vidgen_api::ws;
use vidgen_core::generation::VideoGenerator;
use vidgen_core::lifecycle::VideoStore;
use vidgen_db::{DbConfig, PgVideoStore};
use vidgen_events::EventBus;
use vidgen_veo::{GeneratorConfig, VeoApi};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidgen_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let generator_config = GeneratorConfig::from_env();
    let generator_info = generator_config.info();
    tracing::info!(
        base_url = %generator_info.base_url,
        model = %generator_info.model,
        api_key = %generator_info.api_key_masked,
        api_key_length = generator_info.api_key_length,
        "Loaded generator configuration"
    );

    let db_config = DbConfig::from_env();
    config
        .check_request_timeout(generator_config.timeout(), db_config.acquire_timeout())
        .unwrap_or_else(|e| panic!("Invalid timeout configuration: {e}"));

    // --- Database ---
    let pool = vidgen_db::connect(&db_config)
        .await
        .expect("Failed to connect to database");
    tracing::info!(
        max_connections = db_config.max_connections,
        "Database connection pool created"
    );

    vidgen_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    vidgen_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Lifecycle seams ---
    let store: Arc<dyn VideoStore> = Arc::new(PgVideoStore::new(pool.clone()));
    let generator: Arc<dyn VideoGenerator> =
        Arc::new(VeoApi::new(&generator_config).expect("Failed to build generator client"));

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let notification_router = NotificationRouter::new(Arc::clone(&ws_manager));
    let router_handle = tokio::spawn(notification_router.run(event_bus.subscribe()));
    tracing::info!("Notification router started");

    // --- Status poller ---
    let poller = Arc::new(StatusPoller::new(
        Arc::clone(&store),
        Arc::clone(&generator),
        Arc::clone(&event_bus),
        config.poller.poll_options(),
    ));
    let poller_cancel = CancellationToken::new();
    let poller_handle = match config.poller.interval() {
        Some(interval) => Some(tokio::spawn(
            Arc::clone(&poller).run(interval, poller_cancel.clone()),
        )),
        None => {
            tracing::info!("Background status poller disabled (POLL_INTERVAL_SECS=0)");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        store,
        generator,
        poller,
        generator_info: Arc::new(generator_info),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    poller_cancel.cancel();
    if let Some(handle) = poller_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Status poller stopped");

    // The app state (and its event bus clone) went away with the server;
    // dropping the last sender closes the channel for the router.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), router_handle).await;

    ws_manager.shutdown_all().await;
    heartbeat_handle.abort();

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
