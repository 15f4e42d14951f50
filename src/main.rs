//! Listing Cache - property listings backend with layered caching
//!
//! Serves property listings through Redis-backed response and queryset caches.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use listing_cache::api::create_router;
use listing_cache::cache::{CacheBackend, MemoryStore, RedisStore};
use listing_cache::config::CacheBackendKind;
use listing_cache::listings::demo_listings;
use listing_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the listings server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the cache store (Redis, or in-memory with its cleanup task)
/// 4. Wire repository, caches and invalidation hook
/// 5. Clear stale listing caches and seed demo listings
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listing_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting listings server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, port={}, response_cache_ttl={}s, invalidation_pattern={}",
        config.cache_backend,
        config.server_port,
        config.response_cache_ttl,
        config.invalidation_pattern
    );

    let (store, cleanup_handle): (Arc<dyn CacheBackend>, Option<JoinHandle<()>>) =
        match config.cache_backend {
            CacheBackendKind::Redis => {
                let store: Arc<dyn CacheBackend> = Arc::new(
                    RedisStore::connect(&config.redis_url)
                        .await
                        .with_context(|| format!("connecting to Redis at {}", config.redis_url))?,
                );
                (store, None)
            }
            CacheBackendKind::Memory => {
                let memory = Arc::new(MemoryStore::new());
                let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
                info!("In-memory cache store initialized");
                let store: Arc<dyn CacheBackend> = memory;
                (store, Some(handle))
            }
        };

    let state = AppState::new(store, &config).await;

    // The repository starts empty on every run, so anything cached by a
    // previous process is stale.
    if let Err(err) = state.invalidator.clear_all().await {
        warn!(error = %err, "Could not clear listing caches at startup");
    }

    if config.seed_listings {
        for listing in demo_listings() {
            state.repository.create(listing).await?;
        }
        info!("Seeded demo listings");
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
