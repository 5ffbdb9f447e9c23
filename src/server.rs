//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, the background worker, and the Axum server lifecycle.

use crate::application::background_worker::run_background_worker;
use crate::application::services::{HealthMonitor, LinkService, ResolutionService};
use crate::config::Config;
use crate::domain::background_job::JobQueue;
use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::infrastructure::http::ReqwestFetcher;
use crate::infrastructure::memory::{InMemoryLinkRepository, InMemoryStatsRepository};
use crate::infrastructure::persistence::{PgLinkRepository, PgStatsRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Link and stats stores selected by configuration.
pub struct Stores {
    pub links: Arc<dyn LinkRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

/// Connects to PostgreSQL and applies migrations, or falls back to memory.
///
/// # Errors
///
/// Returns an error if the database is configured but unreachable, or if
/// migrations fail.
pub async fn open_stores(config: &Config) -> Result<Stores> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("No database configured, using in-memory store (data is lost on restart)");
        return Ok(Stores {
            links: Arc::new(InMemoryLinkRepository::new()),
            stats: Arc::new(InMemoryStatsRepository::new()),
        });
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

    let pool = Arc::new(pool);
    Ok(Stores {
        links: Arc::new(PgLinkRepository::new(pool.clone())),
        stats: Arc::new(PgStatsRepository::new(pool)),
    })
}

/// Builds the health monitor used by the worker and the admin CLI.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_health_monitor(config: &Config, stores: &Stores) -> Result<HealthMonitor> {
    let fetcher = ReqwestFetcher::new(config.fetch_timeout(), config.max_redirects)
        .context("Failed to build HTTP client")?;

    Ok(HealthMonitor::new(stores.links.clone(), stores.stats.clone(), Arc::new(fetcher))
        .with_unreachable_status(config.unreachable_status))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link and stats stores (PostgreSQL with migrations, or in-memory)
/// - HTTP fetcher and health monitor
/// - Background job queue and worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = open_stores(&config).await?;
    let monitor = Arc::new(build_health_monitor(&config, &stores)?);

    let (job_queue, job_rx) = JobQueue::channel(config.job_queue_capacity);
    let worker = tokio::spawn(run_background_worker(
        job_rx,
        stores.links.clone(),
        monitor,
        config.background_concurrency,
    ));
    tracing::info!(
        concurrency = config.background_concurrency,
        "Background worker started"
    );

    let state = AppState::new(
        Arc::new(ResolutionService::new(stores.links.clone(), job_queue.clone())),
        Arc::new(LinkService::new(stores.links.clone())),
        job_queue,
        config.base_url.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last queue handles; the worker drains what is left.
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Background worker panicked");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
