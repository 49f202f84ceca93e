//! File and folder lifecycle.

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use jotter_auth::PasswordHasher;
use jotter_core::error::AppError;
use jotter_core::traits::ObjectStore;
use jotter_database::{FileStore, UserStore};
use jotter_entity::file::{CreateFile, File, FileFilter, FileKind, FileMetadata};
use jotter_entity::storage::StorageInfo;
use jotter_entity::user::User;

use super::content::{self, QuotaReservation};

/// Deepest folder nesting accepted by `create_folder`.
pub const MAX_FOLDER_DEPTH: usize = 64;

/// Tunables for [`FileService`].
#[derive(Debug, Clone, Copy)]
pub struct FileServiceLimits {
    /// Largest accepted upload in bytes.
    pub max_upload_size_bytes: u64,
}

/// Content and options for a new upload.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Filename supplied by the client.
    pub name: String,
    /// Declared media type.
    pub mime_type: String,
    /// Raw content.
    pub bytes: Bytes,
    /// Create the file as private.
    pub is_private: bool,
    /// Privacy password, required when `is_private` is set.
    pub password: Option<String>,
}

/// Manages files, folders, and the owner's storage accounting.
#[derive(Debug, Clone)]
pub struct FileService {
    users: Arc<dyn UserStore>,
    files: Arc<dyn FileStore>,
    objects: Arc<dyn ObjectStore>,
    hasher: PasswordHasher,
    limits: FileServiceLimits,
}

/// Trimmed non-blank value, or `None`.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    Ok(trimmed.to_string())
}

fn file_not_found() -> AppError {
    AppError::not_found("File not found")
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        users: Arc<dyn UserStore>,
        files: Arc<dyn FileStore>,
        objects: Arc<dyn ObjectStore>,
        limits: FileServiceLimits,
    ) -> Self {
        Self {
            users,
            files,
            objects,
            hasher: PasswordHasher::new(),
            limits,
        }
    }

    async fn owner(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(&crate::auth::service::normalize_email(email))
            .await?
            .ok_or_else(|| AppError::authentication("You are not authorized"))
    }

    async fn owned(&self, owner: Uuid, id: Uuid) -> Result<File, AppError> {
        self.files
            .find_owned(owner, id)
            .await?
            .ok_or_else(file_not_found)
    }

    /// Store new content and record it, charging its size to the owner.
    pub async fn upload_file(&self, owner_email: &str, input: UploadInput) -> Result<File, AppError> {
        let name = require_name(&input.name)?;
        let size = input.bytes.len() as u64;
        if size > self.limits.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.limits.max_upload_size_bytes
            )));
        }
        let password_hash = match (input.is_private, present(input.password.as_deref())) {
            (true, Some(password)) => Some(self.hasher.hash_password(password)?),
            (true, None) => {
                return Err(AppError::validation("Password is required for private files"));
            }
            (false, _) => None,
        };

        let owner = self.owner(owner_email).await?;
        let size = size as i64;
        let kind = FileKind::from_mime(&input.mime_type);

        let reservation = QuotaReservation::acquire(self.users.as_ref(), owner.id, size).await?;
        let stored = match self
            .objects
            .store(input.bytes, content::store_options(owner.id, &name, kind))
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                reservation.release(self.users.as_ref()).await;
                return Err(content::external(e, "store content"));
            }
        };

        let public_id = stored.public_id.clone();
        let record = CreateFile {
            name: name.clone(),
            kind,
            size,
            path: stored.public_ref.clone(),
            public_id: Some(public_id.clone()),
            parent_folder: None,
            owner: owner.id,
            is_favorite: false,
            is_private: password_hash.is_some(),
            password_hash,
            tags: Vec::new(),
            metadata: FileMetadata::for_upload(&input.mime_type, &name, stored).to_value(),
        };

        match self.files.create(&record).await {
            Ok(file) => {
                reservation.commit();
                info!(user_id = %owner.id, file_id = %file.id, size, "File uploaded");
                Ok(file)
            }
            Err(e) => {
                content::discard_object(self.objects.as_ref(), &public_id).await;
                reservation.release(self.users.as_ref()).await;
                Err(e)
            }
        }
    }

    /// Create an empty folder, optionally inside another folder.
    pub async fn create_folder(
        &self,
        owner_email: &str,
        name: &str,
        parent_folder: Option<Uuid>,
    ) -> Result<File, AppError> {
        let name = require_name(name)?;
        let owner = self.owner(owner_email).await?;
        if let Some(parent) = parent_folder {
            self.check_parent(owner.id, parent).await?;
        }

        let folder = self
            .files
            .create(&CreateFile {
                name,
                kind: FileKind::Folder,
                size: 0,
                path: content::folder_path(owner.id),
                public_id: None,
                parent_folder,
                owner: owner.id,
                is_favorite: false,
                is_private: false,
                password_hash: None,
                tags: Vec::new(),
                metadata: serde_json::json!({}),
            })
            .await?;

        info!(user_id = %owner.id, folder_id = %folder.id, "Folder created");
        Ok(folder)
    }

    /// Parent must be the owner's folder with a bounded, acyclic ancestry.
    async fn check_parent(&self, owner: Uuid, parent: Uuid) -> Result<(), AppError> {
        let folder = self
            .files
            .find_owned(owner, parent)
            .await?
            .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
        if !folder.is_folder() {
            return Err(AppError::validation("Parent is not a folder"));
        }

        let mut seen = HashSet::from([folder.id]);
        let mut depth = 1;
        let mut next = folder.parent_folder;
        loop {
            if depth >= MAX_FOLDER_DEPTH {
                return Err(AppError::validation(format!(
                    "Folders cannot be nested more than {MAX_FOLDER_DEPTH} levels deep"
                )));
            }
            let Some(id) = next else { break };
            if !seen.insert(id) {
                warn!(user_id = %owner, folder_id = %id, "Folder cycle detected");
                return Err(AppError::validation("Folder hierarchy contains a cycle"));
            }
            depth += 1;
            next = match self.files.find_owned(owner, id).await? {
                Some(ancestor) => ancestor.parent_folder,
                None => None,
            };
        }
        Ok(())
    }

    /// The owner's files matching `filter`.
    pub async fn get_files(&self, owner_email: &str, filter: &FileFilter) -> Result<Vec<File>, AppError> {
        let owner = self.owner(owner_email).await?;
        self.files.list(owner.id, filter).await
    }

    /// Flip the favorite flag.
    pub async fn toggle_favorite(&self, owner_email: &str, id: Uuid) -> Result<File, AppError> {
        let owner = self.owner(owner_email).await?;
        let file = self.owned(owner.id, id).await?;
        let updated = self
            .files
            .set_favorite(owner.id, id, !file.is_favorite)
            .await?
            .ok_or_else(file_not_found)?;
        info!(user_id = %owner.id, file_id = %id, favorite = updated.is_favorite, "Favorite toggled");
        Ok(updated)
    }

    /// Make a public file private, or a private one public.
    ///
    /// Both directions need a password. Going public needs the current one.
    pub async fn toggle_private(
        &self,
        owner_email: &str,
        id: Uuid,
        password: Option<&str>,
    ) -> Result<File, AppError> {
        let owner = self.owner(owner_email).await?;
        let file = self.owned(owner.id, id).await?;
        let password = present(password)
            .ok_or_else(|| AppError::validation("Password is required"))?;

        let new_hash = if file.is_private {
            let matches = match file.password_hash.as_deref() {
                Some(hash) => self.hasher.verify_password(password, hash)?,
                None => false,
            };
            if !matches {
                warn!(user_id = %owner.id, file_id = %id, "Privacy password mismatch");
                return Err(AppError::authentication("Password is incorrect"));
            }
            None
        } else {
            Some(self.hasher.hash_password(password)?)
        };

        let updated = self
            .files
            .set_privacy(owner.id, id, new_hash.as_deref())
            .await?
            .ok_or_else(file_not_found)?;
        info!(user_id = %owner.id, file_id = %id, private = updated.is_private, "Privacy toggled");
        Ok(updated)
    }

    /// Change a file's display name.
    pub async fn rename_file(&self, owner_email: &str, id: Uuid, new_name: &str) -> Result<File, AppError> {
        let name = require_name(new_name)?;
        let owner = self.owner(owner_email).await?;
        let updated = self
            .files
            .rename(owner.id, id, &name)
            .await?
            .ok_or_else(file_not_found)?;
        info!(user_id = %owner.id, file_id = %id, "File renamed");
        Ok(updated)
    }

    /// Remove a file and its content, refunding its size.
    ///
    /// Stored content is removed first; if that fails the record and quota
    /// are left untouched.
    pub async fn delete_file(&self, owner_email: &str, id: Uuid) -> Result<File, AppError> {
        let owner = self.owner(owner_email).await?;
        let file = self.owned(owner.id, id).await?;

        if file.is_folder() && self.files.count_children(owner.id, id).await? > 0 {
            return Err(AppError::conflict("Folder is not empty"));
        }
        if let Some(public_id) = file.stored_content_id() {
            self.objects
                .delete(public_id)
                .await
                .map_err(|e| content::external(e, "delete stored content"))?;
        }

        if !self.files.delete(owner.id, id).await? {
            return Err(file_not_found());
        }
        if !file.is_folder() && file.size > 0 {
            self.users.release_storage(owner.id, file.size).await?;
        }

        info!(user_id = %owner.id, file_id = %id, size = file.size, "File deleted");
        Ok(file)
    }

    /// Copy a file, including its stored content, as `"<name> (copy)"`.
    pub async fn duplicate_file(&self, owner_email: &str, id: Uuid) -> Result<File, AppError> {
        let owner = self.owner(owner_email).await?;
        let source = self.owned(owner.id, id).await?;

        let reservation =
            QuotaReservation::acquire(self.users.as_ref(), owner.id, source.size).await?;

        let mut metadata = FileMetadata::from_value(&source.metadata);
        let mut path = source.path.clone();
        let mut public_id = None;

        if source.is_folder() {
            path = content::folder_path(owner.id);
        } else if let Some(source_id) = source.stored_content_id() {
            let hint = metadata
                .original_name
                .clone()
                .unwrap_or_else(|| source.name.clone());
            let copied = match self.copy_object(owner.id, source_id, &hint, source.kind).await {
                Ok(copied) => copied,
                Err(e) => {
                    reservation.release(self.users.as_ref()).await;
                    return Err(e);
                }
            };
            path = copied.public_ref.clone();
            public_id = Some(copied.public_id.clone());
            metadata.object = Some(copied);
        }

        let record = CreateFile {
            name: source.copy_name(),
            kind: source.kind,
            size: source.size,
            path,
            public_id: public_id.clone(),
            parent_folder: source.parent_folder,
            owner: owner.id,
            is_favorite: source.is_favorite,
            is_private: source.is_private,
            password_hash: source.password_hash.clone(),
            tags: source.tags.clone(),
            metadata: if source.metadata.is_null() {
                serde_json::Value::Null
            } else {
                metadata.to_value()
            },
        };

        match self.files.create(&record).await {
            Ok(copy) => {
                reservation.commit();
                info!(user_id = %owner.id, source_id = %id, file_id = %copy.id, "File duplicated");
                Ok(copy)
            }
            Err(e) => {
                if let Some(public_id) = public_id {
                    content::discard_object(self.objects.as_ref(), &public_id).await;
                }
                reservation.release(self.users.as_ref()).await;
                Err(e)
            }
        }
    }

    async fn copy_object(
        &self,
        owner: Uuid,
        source_id: &str,
        filename_hint: &str,
        kind: FileKind,
    ) -> Result<jotter_core::traits::StoredObject, AppError> {
        let data = self
            .objects
            .fetch_bytes(source_id)
            .await
            .map_err(|e| content::external(e, "fetch stored content"))?;
        self.objects
            .store(data, content::store_options(owner, filename_hint, kind))
            .await
            .map_err(|e| content::external(e, "store content"))
    }

    /// Quota summary for the owner.
    pub async fn get_storage_info(&self, owner_email: &str) -> Result<StorageInfo, AppError> {
        let owner = self.owner(owner_email).await?;
        Ok(StorageInfo::from(&owner))
    }
}
