//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL pool and migrations, or the in-memory store when no
///   `DATABASE_URL` is configured
/// - Background click worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Generator settings are invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = connect_store(&config).await?;
    let generator = config.code_generator()?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(click_rx, repository.clone()));
    tracing::info!("Click worker started");

    let state = AppState::new(repository, generator, click_tx)
        .with_base_url(config.base_url.clone())
        .with_strict_url_validation(config.strict_url_validation);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the configured store.
async fn connect_store(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, links are kept in memory");
        return Ok(Arc::new(InMemoryLinkRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
