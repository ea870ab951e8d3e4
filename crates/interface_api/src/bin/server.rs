//! Claims Tracker - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-api
//!
//! # Run with environment variables
//! API_PORT=9000 API_DATABASE_URL=postgres://... API_SEED_SAMPLE_DATA=true cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `API_DB_ACQUIRE_TIMEOUT_SECS` - Wait for a pooled connection (default: 30)
//! * `API_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! * `API_STRICT_TRANSITIONS` - Forbid reopening decided claims (default: false)
//! * `API_SEED_SAMPLE_DATA` - Provision sample users on start-up (default: false)
//! * `API_NOTIFICATION_CAPACITY` - Buffered notifications per channel (default: 64)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::{ClaimLifecycle, NotificationDispatcher};
use domain_users::{seed_sample_users, UserService};
use infra_db::{create_pool, run_migrations, PostgresClaimStore, PostgresUserDirectory};
use infra_notify::BroadcastHub;
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        policy = ?config.transition_policy(),
        "Starting claims tracker API server"
    );

    let pool = create_pool(config.database_config())
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool).await.context("failed to apply migrations")?;

    let user_directory = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let claim_store = Arc::new(PostgresClaimStore::new(pool));
    let hub = BroadcastHub::new(config.notification_capacity);

    let users = UserService::new(user_directory.clone());
    let lifecycle = ClaimLifecycle::new(
        claim_store.clone(),
        user_directory.clone(),
        NotificationDispatcher::new(Arc::new(hub.clone())),
    )
    .with_transition_policy(config.transition_policy());

    if config.seed_sample_data {
        seed_sample_users(&users).await.context("failed to seed sample users")?;
    }

    let state = AppState::new(lifecycle, users, hub, config.clone())
        .with_health_check(user_directory)
        .with_health_check(claim_store);
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse().context("invalid server address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
///
/// If a handler cannot be installed the failure is logged and that signal
/// is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
