//! Phase Timers - grouped countdowns cycling between protection and capture
//!
//! This is the main entry point for the phase-timers server.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use phase_timers::{
    api::create_router,
    config::Config,
    state::{AppState, SystemTimeSource},
    storage::JsonFileStore,
    tasks::tick_task,
    utils::shutdown_signal,
    view::Labels,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("phase_timers={},tower_http=info", config.log_level()))
        .init();

    info!("Starting phase-timers server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data={}, tick={}ms",
        config.host,
        config.port,
        config.data_file.display(),
        config.tick_ms
    );

    let labels = match &config.labels {
        Some(path) => Labels::from_file(path)?,
        None => Labels::default(),
    };

    // Refuse to start on unreadable data rather than overwrite it with an empty list
    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let state = Arc::new(
        AppState::new(store, Arc::new(SystemTimeSource), labels)
            .with_context(|| format!("failed to load timers from {}", config.data_file.display()))?,
    );

    // Start the tick background task
    let tick_state = Arc::clone(&state);
    let period = config.tick_period();
    tokio::spawn(async move {
        tick_task(tick_state, period).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers             - Sorted timers for the active filter");
    info!("  POST   /timers             - Add a timer");
    info!("  PATCH  /timers/:id         - Rename or regroup a timer");
    info!("  DELETE /timers/:id         - Remove a timer");
    info!("  POST   /timers/:id/toggle  - Toggle the checked marker");
    info!("  GET    /groups             - List groups");
    info!("  PUT    /filter             - Set the group filter");
    info!("  POST   /editing/:id        - Begin editing a timer");
    info!("  PUT    /editing            - Apply the edit");
    info!("  DELETE /editing            - Cancel the edit");
    info!("  GET    /export             - Export timers as JSON");
    info!("  POST   /import?confirm=    - Preview or apply an import");
    info!("  GET    /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
