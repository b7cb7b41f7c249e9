//! Spendwise API Server
//!
//! REST API server for departmental expense tracking: monthly limits,
//! carryover between months, and atomic expense admission.
//!
//! # Features
//!
//! - JWT bearer authentication
//! - PostgreSQL or in-memory record store
//! - OpenAPI documentation with Swagger UI
//! - Prometheus metrics export
//! - Graceful shutdown handling
//! - Health check endpoints
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! spendwise-api-server
//!
//! # Start with custom config
//! spendwise-api-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! SPENDWISE__SERVER__PORT=8080 spendwise-api-server
//!
//! # Throwaway instance without PostgreSQL
//! spendwise-api-server --storage memory --dev-mode
//! ```

mod config;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spendwise_api::{create_router, AppState};
use spendwise_auth::AuthService;
use spendwise_db::Database;
use spendwise_ledger::{MemoryStore, Store};

use crate::config::{ServerConfig, StorageBackend};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Spendwise API Server - departmental expense tracking
#[derive(Parser, Debug)]
#[command(name = "spendwise-api-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "SPENDWISE_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "SPENDWISE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SPENDWISE_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SPENDWISE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "SPENDWISE_LOG_FORMAT")]
    log_format: Option<String>,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Record store backend
    #[arg(long, value_enum, env = "SPENDWISE_STORAGE")]
    storage: Option<StorageBackend>,

    /// JWT secret key
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Enable development mode (allows the placeholder JWT secret)
    #[arg(long, env = "SPENDWISE_DEV_MODE")]
    dev_mode: bool,
}

impl Args {
    /// Apply CLI overrides on top of file and environment values
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(url) = self.database_url {
            config.database.postgres_url = url;
        }
        if let Some(backend) = self.storage {
            config.database.backend = backend;
        }
        if let Some(secret) = self.jwt_secret {
            config.auth.jwt_secret = secret;
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let dev_mode = args.dev_mode;

    let mut server_config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut server_config);

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dev_mode,
        "Starting Spendwise API Server"
    );

    server_config.validate(dev_mode)?;

    let store = init_store(&server_config.database).await?;
    let auth = Arc::new(AuthService::new(server_config.auth.auth_config()));
    let state = Arc::new(AppState::new(store, auth));

    let app = create_router(state, server_config.api_config());

    if server_config.metrics.enabled {
        start_metrics_exporter(server_config.metrics.port)?;
    }

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        host = %server_config.server.host,
        port = server_config.server.port,
        "Server listening"
    );

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            result??;
        }
        _ = shutdown_signal() => {
            let _ = stop_tx.send(());
            let timeout = server_config.server.shutdown_timeout();
            tracing::info!(
                timeout_secs = timeout.as_secs(),
                "Waiting for in-flight requests to complete..."
            );
            match tokio::time::timeout(timeout, server).await {
                Ok(result) => result??,
                Err(_) => tracing::warn!("Shutdown timeout elapsed; dropping open connections"),
            }
        }
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => subscriber
            .with(fmt::layer().json().with_target(true))
            .try_init()?,
        _ => subscriber
            .with(fmt::layer().pretty().with_target(true))
            .try_init()?,
    }

    Ok(())
}

/// Build the record store for the configured backend
async fn init_store(config: &config::DatabaseSettings) -> anyhow::Result<Arc<dyn Store>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; nothing is persisted");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let db = Database::connect(&config.db_config()).await?;

            if config.run_migrations {
                db.migrate().await?;
            }

            let health = db.health_check().await;
            if !health.healthy {
                anyhow::bail!("Database health check failed");
            }
            tracing::info!(postgres = health.postgres, "Database health check passed");

            Ok(Arc::new(db))
        }
    }
}

/// Install the Prometheus recorder and its HTTP listener
fn start_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(port, "Metrics exporter started");
    Ok(())
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from([
            "spendwise-api-server",
            "--port",
            "8080",
            "--storage",
            "memory",
            "--dev-mode",
        ]);
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.storage, Some(StorageBackend::Memory));
        assert!(args.dev_mode);
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = ServerConfig::default();
        let args = Args::parse_from([
            "spendwise-api-server",
            "--log-format",
            "json",
            "--jwt-secret",
            "an-operator-provided-secret-of-32-bytes",
        ]);
        args.apply(&mut config);

        assert_eq!(config.logging.format, "json");
        assert_eq!(config.auth.jwt_secret, "an-operator-provided-secret-of-32-bytes");
        assert_eq!(config.server.port, 3000);
    }
}
