//! Tizhi Server
//!
//! HTTP boundary for the constitution classification engine. Owns
//! everything the engine must not know about: API-key authentication,
//! rate limiting, body-size and timeout enforcement, CORS, request
//! logging, and the recommendation text bank.

#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod handlers;
pub mod ratelimit;
pub mod recommendations;

use config::ServerConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the estimation HTTP server
///
/// Loads configuration, builds the rule database (fatal if the table
/// is malformed), and starts the axum server.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Tizhi server");
    info!("Bind address: {}", config.bind_addr());
    info!("Configured API keys: {}", config.api_keys.len());
    info!("Rate limit: {} requests/minute", config.rate_limit_per_minute);
    info!("Max body size: {} bytes", config.max_body_bytes);
    info!("Request timeout: {} seconds", config.request_timeout_secs);

    // Build the rule database and application state
    let state = AppState::from_config(&config);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
