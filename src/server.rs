//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::geo_locator::{GeoLocator, NoopGeoLocator};
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::geo::HttpGeoLocator;
use crate::infrastructure::persistence::{
    PgCampaignRepository, PgUrlRepository, PgVisitRepository,
};
use crate::routes::app_router;
use crate::state::{AppState, Settings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Cache (Redis, in-process fallback, or disabled)
/// - Background visit worker with geolocation
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let cache = build_cache(&config).await;
    let geo = build_geo_locator(&config)?;

    let pool = Arc::new(pool);
    let urls = Arc::new(PgUrlRepository::new(pool.clone()));
    let visits = Arc::new(PgVisitRepository::new(pool.clone()));
    let campaigns = Arc::new(PgCampaignRepository::new(pool.clone()));

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);
    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        visits.clone(),
        geo,
        config.visit_worker_concurrency,
    ));
    tracing::info!("Visit worker started");

    let state = AppState::new(
        urls,
        visits,
        campaigns,
        cache,
        visit_tx,
        Settings::from_config(&config),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it every visit sender) is gone; let the worker
    // store what is queued or still in flight.
    if tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .is_err()
    {
        tracing::warn!("Visit worker did not drain within 10s");
    }

    Ok(())
}

/// Builds the connection pool from the `DB_*` pool settings.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    if !config.cache_enabled {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    }

    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache enabled (in-process)");
        return Arc::new(MemoryCache::with_capacity(config.cache_memory_capacity));
    };

    match RedisCache::connect(redis_url).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
            Arc::new(MemoryCache::with_capacity(config.cache_memory_capacity))
        }
    }
}

fn build_geo_locator(config: &Config) -> Result<Arc<dyn GeoLocator>> {
    if !config.geo_lookup_enabled {
        tracing::info!("Geo lookup disabled");
        return Ok(Arc::new(NoopGeoLocator));
    }

    let locator = HttpGeoLocator::new(
        config.geo_lookup_url.clone(),
        Duration::from_millis(config.geo_lookup_timeout_ms),
    )
    .context("Failed to build geolocation client")?;

    Ok(Arc::new(locator))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
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
