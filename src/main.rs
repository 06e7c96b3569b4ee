//! Tana API server
//!
//! Main entry point that wires the crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt};

use tana_api::AppState;
use tana_auth::{SessionManager, SessionStore};
use tana_cache::CacheManager;
use tana_core::config::AppConfig;
use tana_core::error::AppError;
use tana_realtime::bridge::RedisEventSource;
use tana_realtime::{EventBridge, EventHub};

#[tokio::main]
async fn main() {
    let env = std::env::var("TANA_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Tana API v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // ── Step 1: Session cache ────────────────────────────────────
    let cache = Arc::new(CacheManager::new(&config.cache).await?);
    tracing::info!(provider = %config.cache.provider, "Cache initialized");

    // ── Step 2: User store ───────────────────────────────────────
    let users = tana_database::build_user_store(&config.database).await?;
    tracing::info!(driver = %config.database.driver, "User store initialized");

    // ── Step 3: Sessions ─────────────────────────────────────────
    let store = SessionStore::new(cache.clone(), users.clone(), config.session.clone());
    let sessions = Arc::new(SessionManager::new(store));

    // ── Step 4: Event hub and bridge ─────────────────────────────
    let hub = EventHub::new(config.events.buffer_size);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let bridge_handle = if config.events.enabled {
        Some(spawn_event_bridge(&config, hub.clone(), shutdown_rx)?)
    } else {
        tracing::info!("Event bridge disabled");
        None
    };

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = AppState {
        config: config.clone(),
        cache,
        users,
        sessions,
        hub,
    };
    let app = tana_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .map_err(|e| {
            AppError::configuration(format!("Failed to bind {}: {e}", config.server.addr))
        })?;
    tracing::info!(addr = %config.server.addr, "Tana API listening");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = bridge_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        let _ = tokio::time::timeout(grace, handle).await;
    }

    tracing::info!("Tana API shut down gracefully");
    Ok(())
}

/// Start the pub/sub bridge. Under the `exit` transport policy a bridge
/// failure terminates the process.
fn spawn_event_bridge(
    config: &AppConfig,
    hub: EventHub,
    shutdown: watch::Receiver<bool>,
) -> Result<JoinHandle<()>, AppError> {
    let url = if config.events.url.is_empty() {
        &config.cache.redis.url
    } else {
        &config.events.url
    };
    let source = RedisEventSource::open(url)?;
    let bridge = EventBridge::new(source, hub, config.events.clone());

    Ok(tokio::spawn(async move {
        if let Err(e) = bridge.run(shutdown).await {
            tracing::error!(error = %e, "Event bridge terminated, exiting");
            std::process::exit(1);
        }
    }))
}

/// Wait for Ctrl+C or SIGTERM.
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
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
