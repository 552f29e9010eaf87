//! jotter-api - HTTP server for jotter

use tokio::signal;
use tracing::{error, info};

use jotter_api::{create_router, AppState, Config, LogConfig, StoreKind};
use jotter_db::{log_pool_metrics, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let log_config = LogConfig::from_env();
    let _file_guard = jotter_api::logging::init_logging(&log_config);
    info!(
        log_format = ?log_config.format,
        log_file = %log_config
            .file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(stdout)".to_string()),
        "Logging initialized"
    );

    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    let (state, db) = match config.store {
        StoreKind::Postgres => {
            info!("Connecting to database...");
            let db = Database::connect(&config.database_url, &config.pool_config()).await?;
            info!("Database connected");

            info!("Running database migrations...");
            db.migrate().await?;
            info!("Database migrations complete");
            log_pool_metrics(db.pool());

            (AppState::postgres(&db)?, Some(db))
        }
        StoreKind::Memory => {
            info!("Using in-memory store; data is lost on shutdown");
            (AppState::in_memory()?, None)
        }
    };

    let app = create_router(state, &config.assets_dir);

    info!(
        assets_dir = %config.assets_dir.display(),
        "Starting server on {}",
        addr
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }
    info!("Server shutdown complete");

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, starting graceful shutdown");
}
