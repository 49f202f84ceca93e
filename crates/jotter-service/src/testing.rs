//! Shared fixtures for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use jotter_auth::{JwtDecoder, JwtEncoder};
use jotter_core::config::auth::AuthConfig;
use jotter_core::error::AppError;
use jotter_core::result::AppResult;
use jotter_core::traits::{Mailer, ObjectStore, StoreOptions, StoredObject};
use jotter_database::UserStore;
use jotter_database::memory::{MemoryFileStore, MemoryUserStore};
use jotter_entity::user::{CreateUser, User};
use jotter_storage::providers::memory::MemoryObjectStore;

use crate::{AuthService, FileService, FileServiceLimits, UserService};

const DEFAULT_QUOTA: i64 = 15 * 1024 * 1024 * 1024;

/// One email captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub(crate) struct SentMail {
    pub to: String,
    pub subject: String,
    pub vars: HashMap<String, String>,
}

/// Mailer that keeps every message in memory.
#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn last(&self) -> Option<SentMail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_templated(
        &self,
        to: &str,
        subject: &str,
        _template: &str,
        vars: &HashMap<String, String>,
    ) -> AppResult<()> {
        if self.fail {
            return Err(AppError::delivery("mail relay unavailable"));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            vars: vars.clone(),
        });
        Ok(())
    }
}

/// Memory object store with switchable failures.
#[derive(Debug)]
pub(crate) struct FlakyObjectStore {
    inner: MemoryObjectStore,
    fail_store: AtomicBool,
    fail_delete: AtomicBool,
    fail_fetch: AtomicBool,
    delete_calls: AtomicUsize,
}

impl FlakyObjectStore {
    fn new() -> Self {
        Self {
            inner: MemoryObjectStore::new("http://objects.test"),
            fail_store: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryObjectStore {
        &self.inner
    }

    /// Deletions attempted so far, failed ones included.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for FlakyObjectStore {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn store(&self, data: Bytes, options: StoreOptions) -> AppResult<StoredObject> {
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(AppError::external("store unavailable"));
        }
        self.inner.store(data, options).await
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::external("store unavailable"));
        }
        self.inner.delete(public_id).await
    }

    async fn fetch_bytes(&self, public_id: &str) -> AppResult<Bytes> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::external("store unavailable"));
        }
        self.inner.fetch_bytes(public_id).await
    }
}

/// Services wired to in-memory stores.
pub(crate) struct Harness {
    pub users: Arc<MemoryUserStore>,
    pub objects: Arc<FlakyObjectStore>,
    pub mailer: Arc<RecordingMailer>,
    pub auth: AuthService,
    pub user_service: UserService,
    pub files: FileService,
}

pub(crate) fn auth_config() -> AuthConfig {
    AuthConfig {
        access_secret: "access-secret-for-tests".into(),
        refresh_secret: "refresh-secret-for-tests".into(),
        access_ttl_minutes: 15,
        refresh_ttl_hours: 24,
        password_min_length: 6,
        password_max_length: 20,
        otp_ttl_minutes: 15,
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::new())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        let config = auth_config();
        let users = Arc::new(MemoryUserStore::new());
        let files = Arc::new(MemoryFileStore::new());
        let objects = Arc::new(FlakyObjectStore::new());
        let mailer = Arc::new(mailer);

        let auth = AuthService::new(
            users.clone(),
            mailer.clone(),
            Arc::new(JwtEncoder::new(&config)),
            Arc::new(JwtDecoder::new(&config)),
            &config,
            DEFAULT_QUOTA,
        );
        let user_service = UserService::new(users.clone());
        let file_service = FileService::new(
            users.clone(),
            files,
            objects.clone(),
            FileServiceLimits {
                max_upload_size_bytes: 1024,
            },
        );

        Self {
            users,
            objects,
            mailer,
            auth,
            user_service,
            files: file_service,
        }
    }

    /// Insert a user directly, skipping password hashing.
    pub async fn user(&self, email: &str) -> User {
        self.user_with_quota(email, DEFAULT_QUOTA).await
    }

    pub async fn user_with_quota(&self, email: &str, storage_limit: i64) -> User {
        self.users
            .create(&CreateUser {
                name: "Test".into(),
                email: email.to_string(),
                password_hash: "unused".into(),
                storage_limit,
            })
            .await
            .unwrap()
    }
}
