//! Quota reservations and object-store housekeeping for file content.

use tracing::{debug, warn};
use uuid::Uuid;

use jotter_core::error::{AppError, ErrorKind};
use jotter_core::traits::{ObjectStore, ResourceKind, StoreOptions};
use jotter_database::UserStore;
use jotter_entity::file::FileKind;

/// Object-store prefix for one owner's content.
pub(crate) fn owner_namespace(owner: Uuid) -> String {
    format!("jotter/users/{owner}")
}

/// Synthetic path given to a new folder.
pub(crate) fn folder_path(owner: Uuid) -> String {
    format!("folder://{owner}/{}", Uuid::new_v4())
}

/// Placement options for content of `kind`.
pub(crate) fn store_options(owner: Uuid, filename_hint: &str, kind: FileKind) -> StoreOptions {
    StoreOptions {
        namespace: owner_namespace(owner),
        filename_hint: filename_hint.to_string(),
        resource_kind: match kind {
            FileKind::Image => ResourceKind::Image,
            _ => ResourceKind::Raw,
        },
    }
}

/// Wrap any object-store failure as a retryable external error.
pub(crate) fn external(err: AppError, action: &str) -> AppError {
    if err.kind == ErrorKind::ExternalService {
        err
    } else {
        let message = format!("Failed to {action}: {}", err.message);
        AppError::with_source(ErrorKind::ExternalService, message, err)
    }
}

/// Bytes charged against an owner's quota that have not yet been
/// committed to a file record.
#[derive(Debug)]
#[must_use]
pub(crate) struct QuotaReservation {
    owner: Uuid,
    bytes: i64,
}

impl QuotaReservation {
    /// Charge `bytes` to `owner`, failing with `Storage` when it does not fit.
    pub(crate) async fn acquire(
        users: &dyn UserStore,
        owner: Uuid,
        bytes: i64,
    ) -> Result<Self, AppError> {
        if bytes > 0 && users.try_reserve_storage(owner, bytes).await?.is_none() {
            return Err(AppError::storage("Not enough storage space"));
        }
        Ok(Self { owner, bytes })
    }

    /// Keep the charge; the file record now accounts for it.
    pub(crate) fn commit(self) {
        debug!(owner = %self.owner, bytes = self.bytes, "Quota charge committed");
    }

    /// Refund the charge. Failures are logged, never returned.
    pub(crate) async fn release(self, users: &dyn UserStore) {
        if self.bytes == 0 {
            return;
        }
        if let Err(e) = users.release_storage(self.owner, self.bytes).await {
            warn!(owner = %self.owner, bytes = self.bytes, error = %e, "Failed to refund quota");
        }
    }
}

/// Best-effort removal of an object that no record will reference.
pub(crate) async fn discard_object(objects: &dyn ObjectStore, public_id: &str) {
    if let Err(e) = objects.delete(public_id).await {
        warn!(public_id = %public_id, error = %e, "Failed to discard orphaned object");
    }
}
