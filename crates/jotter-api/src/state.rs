//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use jotter_auth::{JwtDecoder, JwtEncoder};
use jotter_core::config::AppConfig;
use jotter_core::traits::{Mailer, ObjectStore};
use jotter_database::{DatabasePool, FileStore, UserStore};
use jotter_service::{AuthService, FileService, FileServiceLimits, UserService};

/// Persistence backends the services run against.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Credential store.
    pub users: Arc<dyn UserStore>,
    /// File record store.
    pub files: Arc<dyn FileStore>,
    /// PostgreSQL pool, absent for the in-memory backend.
    pub database: Option<DatabasePool>,
}

/// Shared application state passed to all Axum handlers via `State`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, used by the health check.
    pub database: Option<DatabasePool>,
    /// Content blobs, served back through `/objects`.
    pub objects: Arc<dyn ObjectStore>,
    /// Registration, login, and password recovery.
    pub auth_service: Arc<AuthService>,
    /// Profile and account management.
    pub user_service: Arc<UserService>,
    /// File lifecycle.
    pub file_service: Arc<FileService>,
}

impl AppState {
    /// Wire every service from its backends.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        objects: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let encoder = Arc::new(JwtEncoder::new(&config.auth));
        let decoder = Arc::new(JwtDecoder::new(&config.auth));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&stores.users),
            mailer,
            encoder,
            decoder,
            &config.auth,
            config.storage.default_user_quota_bytes,
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&stores.users)));
        let file_service = Arc::new(FileService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.files),
            Arc::clone(&objects),
            FileServiceLimits {
                max_upload_size_bytes: config.storage.max_upload_size_bytes,
            },
        ));

        Self {
            config: Arc::new(config),
            database: stores.database,
            objects,
            auth_service,
            user_service,
            file_service,
        }
    }
}
