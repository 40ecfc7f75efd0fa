//! Countdown Timer - A state-managed HTTP server driving a countdown
//! 
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::render_log_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_millis);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.tick_period()));

    // Redraw the screen in the log after every timer change
    tokio::spawn(render_log_task(state.timer.snapshot()?, state.timer.events()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start                  - Start the countdown");
    info!("  POST /stop                   - Stop and reset the countdown");
    info!("  POST /select/minutes/:value  - Pick minutes (0-9)");
    info!("  POST /select/seconds/:value  - Pick seconds (0-59)");
    info!("  GET  /status                 - Current timer and screen");
    info!("  GET  /options                - Picker values");
    info!("  GET  /events                 - Server-sent timer updates");
    info!("  POST /hello                  - Hello world");
    info!("  GET  /health                 - Health check");

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

    // No tick source may outlive the server
    state.timer.stop()?;

    info!("Server shutdown complete");
    Ok(())
}
