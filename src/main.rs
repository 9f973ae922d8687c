//! HirePulse notification server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use hirepulse_api::AppState;
use hirepulse_core::config::{AppConfig, DatabaseProvider, LogFormat};
use hirepulse_core::error::AppError;
use hirepulse_database::{
    DatabasePool, MemoryNotificationStore, NotificationRepository, NotificationStore,
};
use hirepulse_service::{NotificationService, RetentionTask};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `HIREPULSE_ENV` overlay and `HIREPULSE__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = AppConfig::environment();
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %AppConfig::environment(),
        "Starting HirePulse"
    );

    // ── Step 1: Notification store ───────────────────────────────
    let (store, db_pool) = build_store(&config).await?;
    tracing::info!(backend = store.backend(), "Notification store ready");

    // ── Step 2: Services ─────────────────────────────────────────
    let notification_service = Arc::new(NotificationService::new(Arc::clone(&store)));

    // ── Step 3: Real-time engine ─────────────────────────────────
    let state = AppState::new(config.clone(), Arc::clone(&notification_service));
    let consumer_handle = state.realtime.start();
    tracing::info!(
        max_per_user = config.realtime.max_connections_per_user,
        ping_interval = config.realtime.ping_interval_seconds,
        "Real-time engine started"
    );

    // ── Step 4: Background retention ─────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let retention = RetentionTask::new(Arc::clone(&store), config.realtime.notifications.clone());
    let retention_handle = tokio::spawn(retention.run(shutdown_rx));

    // ── Step 5: HTTP server ──────────────────────────────────────
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    // Live sockets are closed before the listener drains.
    let realtime = Arc::clone(&state.realtime);
    hirepulse_api::app::serve(listener, state, async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
        if let Err(e) = realtime.shutdown() {
            tracing::warn!(error = %e, "Real-time engine shutdown reported an error");
        }
    })
    .await?;

    // ── Step 6: Drain background tasks ───────────────────────────
    tracing::info!("Waiting for background tasks to complete...");
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    if let Some(handle) = consumer_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Event consumer did not stop within the grace period");
        }
    }
    if tokio::time::timeout(grace, retention_handle).await.is_err() {
        tracing::warn!("Retention task did not stop within the grace period");
    }
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("HirePulse server shut down gracefully");
    Ok(())
}

/// Build the configured notification store, running migrations for PostgreSQL.
async fn build_store(
    config: &AppConfig,
) -> Result<(Arc<dyn NotificationStore>, Option<DatabasePool>), AppError> {
    match config.database.provider {
        DatabaseProvider::Memory => {
            tracing::warn!("Using the in-memory notification store; data is lost on restart");
            Ok((Arc::new(MemoryNotificationStore::new()), None))
        }
        DatabaseProvider::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = DatabasePool::connect(&config.database).await?;

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                hirepulse_database::migration::run_migrations(pool.pool()).await?;
                tracing::info!("Database migrations complete");
            }

            let repo = NotificationRepository::new(pool.pool().clone());
            Ok((Arc::new(repo), Some(pool)))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
