//! Application builder: wires backends, services, and the router, then serves.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use jotter_core::config::AppConfig;
use jotter_core::error::AppError;
use jotter_database::memory::{MemoryFileStore, MemoryUserStore};
use jotter_database::repositories::file::FileRepository;
use jotter_database::repositories::user::UserRepository;
use jotter_database::DatabasePool;

use crate::router::build_router;
use crate::state::{AppState, Stores};

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Open the persistence backend named by `database.backend`.
pub async fn connect_stores(config: &AppConfig) -> Result<Stores, AppError> {
    match config.database.backend.as_str() {
        "postgres" => {
            let db = DatabasePool::connect(&config.database).await?;
            db.migrate().await?;
            Ok(Stores {
                users: Arc::new(UserRepository::new(db.pool())),
                files: Arc::new(FileRepository::new(db.pool())),
                database: Some(db),
            })
        }
        "memory" => {
            info!("Using in-memory stores; data is lost on restart");
            Ok(Stores {
                users: Arc::new(MemoryUserStore::new()),
                files: Arc::new(MemoryFileStore::new()),
                database: None,
            })
        }
        other => Err(AppError::configuration(format!(
            "Unknown database backend '{other}'. Expected one of: postgres, memory"
        ))),
    }
}

/// Runs the Jotter server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!(
        backend = %config.database.backend,
        storage = %config.storage.default_provider,
        mail = %config.mail.provider,
        "Starting Jotter server"
    );

    let stores = connect_stores(&config).await?;
    let objects = jotter_storage::build_object_store(&config.storage).await?;
    let mailer = jotter_mail::build_mailer(&config.mail)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(AppState::new(config, stores, objects, mailer));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, "Jotter server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Jotter server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
