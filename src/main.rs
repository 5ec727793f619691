//! Workout Session - headless backend for a set and rest timer widget
//!
//! This is the main entry point for the workout-session application.

use std::sync::Arc;
use anyhow::Context;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use workout_session::{
    api::create_router,
    catalog::ExerciseCatalog,
    config::Config,
    controller::SessionController,
    state::AppState,
    storage::JsonFileStore,
    tasks::{command_loop, TokioTicker},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("workout_session={},tower_http=info", config.log_level()))
        .init();

    info!("Starting workout-session server v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.data_dir()?;
    info!("Configuration: host={}, port={}, rest={}s, data={}",
          config.host, config.port, config.rest, data_dir.display());

    // Load the catalog and unit preference before accepting requests
    let store = Arc::new(JsonFileStore::new(data_dir));
    let catalog = ExerciseCatalog::load(store).context("Failed to load exercise catalog")?;

    // Timer ticks travel through this channel into the command loop
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let controller = SessionController::new(catalog, Box::new(TokioTicker::new(command_tx)), config.rest)
        .context("Failed to load unit preference")?;

    let state = Arc::new(AppState::new(controller, config.port, config.host.clone()));

    let loop_state = Arc::clone(&state);
    tokio::spawn(async move {
        command_loop(loop_state, command_rx).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /state                - Current snapshot");
    info!("  GET  /events               - Snapshot stream (SSE)");
    info!("  POST /session/select/:id   - Start a session");
    info!("  POST /session/complete     - Complete the current set");
    info!("  POST /session/rest/finish  - Resume before the rest ends");
    info!("  POST /settings/save        - Save settings as exercise defaults");
    info!("  GET  /status               - Compact status");
    info!("  GET  /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(signal) => info!("Shutdown signal {} received", signal),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
