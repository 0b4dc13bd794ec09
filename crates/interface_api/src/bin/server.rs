//! CRM Gateway - API Server Binary
//!
//! This binary starts the HTTP gateway in front of the vendor CRMs.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin cad-gateway
//!
//! # Run with environment variables
//! CAD_PORT=9090 CAD_AUTH_TIMEOUT_SECS=10 cargo run --bin cad-gateway
//! ```
//!
//! # Environment Variables
//!
//! * `CAD_HOST` - Server host (default: 0.0.0.0)
//! * `CAD_PORT` - Server port (default: 8080)
//! * `CAD_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `CAD_AUTH_TIMEOUT_SECS` - Upper bound on each vendor auth call (default: 30)
//! * `CAD_ADAPTER_SOURCE` - Vendor adapters to wire (default: sandbox)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::{config::GatewayConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        adapter_source = ?config.adapter_source,
        auth_timeout_secs = config.auth_timeout_secs,
        "Starting CRM gateway"
    );

    let state = AppState::from_config(config.clone()).context("gateway configuration rejected")?;
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads `CAD_*` configuration, falling back to defaults when the
/// environment cannot be deserialized
fn load_config() -> GatewayConfig {
    GatewayConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Falling back to default configuration: {err}");
        GatewayConfig::default()
    })
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured
/// level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
