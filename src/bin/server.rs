//! Slotwise HTTP server binary.
//!
//! Entry point for the availability REST API. It loads the settings policy,
//! initializes the repository, sets up the HTTP router, and starts serving
//! requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository (default)
//! cargo run --bin slotwise-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `SLOTWISE_CONFIG`: Path to a settings TOML file (default: search for
//!   `slotwise.toml` near the working directory)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use slotwise::db::LocalRepository;
use slotwise::http::{create_router, AppState};
use slotwise::settings::SettingsPolicy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Slotwise HTTP Server");

    // Load the settings policy; missing config falls back to defaults.
    let policy = match env::var("SLOTWISE_CONFIG") {
        Ok(path) => SettingsPolicy::from_file(&path)?,
        Err(_) => SettingsPolicy::from_default_location()?,
    };
    info!(
        advance_booking_days = policy.advance_booking_days,
        max_daily_bookings = policy.max_daily_bookings,
        "Settings policy loaded"
    );

    let repository = Arc::new(LocalRepository::new());
    info!("Repository initialized successfully");

    // Create application state
    let state = AppState::new(repository, policy);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
