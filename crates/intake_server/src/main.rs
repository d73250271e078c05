//! intake_server: onboarding intake REST server.
//!
//! Reads config from flags, environment and `.env` (see `config.rs`):
//!   DATABASE_URL or POSTGRES_HOST/PORT/DB/USER/PASSWORD
//!   INTAKE_BIND_ADDR         listen address (default: 0.0.0.0:8000)
//!   INTAKE_STORE_TIMEOUT_MS  per-call store timeout (default: 5000)

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use intake_core::OnboardingService;
use intake_postgres::PgOnboardingStore;
use intake_server::config::ServerConfig;
use intake_server::router::build_router;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside local development.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,intake_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();
    tracing::info!(bind_addr = %config.bind_addr, "Starting onboarding intake server");

    let store = Arc::new(
        PgOnboardingStore::connect(&config.pg_store_config())
            .await
            .context("database connection failed")?,
    );

    let service = Arc::new(
        OnboardingService::new(Arc::clone(&store) as Arc<dyn intake_core::OnboardingStore>)
            .with_store_timeout(config.store_timeout()),
    );
    let app = build_router(service, config.max_body_bytes);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("intake_server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Database pool closed, shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
