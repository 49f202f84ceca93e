//! In-memory file store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use jotter_core::error::AppError;
use jotter_core::result::AppResult;
use jotter_entity::file::{CreateFile, File, FileFilter};

use crate::store::FileStore;

/// [`FileStore`] backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: DashMap<Uuid, File>,
}

impl MemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn modify_owned(&self, owner: Uuid, id: Uuid, apply: impl FnOnce(&mut File)) -> Option<File> {
        let mut file = self.files.get_mut(&id).filter(|f| f.owner == owner)?;
        apply(&mut *file);
        file.updated_at = Utc::now();
        Some(file.value().clone())
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> AppResult<Option<File>> {
        Ok(self
            .files
            .get(&id)
            .filter(|f| f.owner == owner)
            .map(|f| f.value().clone()))
    }

    async fn list(&self, owner: Uuid, filter: &FileFilter) -> AppResult<Vec<File>> {
        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|f| f.owner == owner && filter.matches(f.value()))
            .map(|f| f.value().clone())
            .collect();
        files.sort_by(|a, b| filter.compare(a, b));
        Ok(files)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        if let Some(parent) = data.parent_folder {
            if !self.files.contains_key(&parent) {
                return Err(AppError::not_found("Parent folder not found"));
            }
        }
        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            kind: data.kind,
            size: data.size,
            path: data.path.clone(),
            public_id: data.public_id.clone(),
            parent_folder: data.parent_folder,
            owner: data.owner,
            is_favorite: data.is_favorite,
            is_private: data.is_private,
            password_hash: data.password_hash.clone(),
            tags: data.tags.clone(),
            metadata: data.metadata.clone(),
            created_at: now,
            updated_at: now,
        };
        self.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn set_favorite(
        &self,
        owner: Uuid,
        id: Uuid,
        favorite: bool,
    ) -> AppResult<Option<File>> {
        Ok(self.modify_owned(owner, id, |f| f.is_favorite = favorite))
    }

    async fn set_privacy(
        &self,
        owner: Uuid,
        id: Uuid,
        password_hash: Option<&str>,
    ) -> AppResult<Option<File>> {
        Ok(self.modify_owned(owner, id, |f| {
            f.is_private = password_hash.is_some();
            f.password_hash = password_hash.map(str::to_string);
        }))
    }

    async fn rename(&self, owner: Uuid, id: Uuid, name: &str) -> AppResult<Option<File>> {
        Ok(self.modify_owned(owner, id, |f| f.name = name.to_string()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<bool> {
        if self.files.iter().any(|f| f.parent_folder == Some(id)) {
            return Err(AppError::conflict("Folder is not empty"));
        }
        Ok(self.files.remove_if(&id, |_, f| f.owner == owner).is_some())
    }

    async fn count_children(&self, owner: Uuid, folder: Uuid) -> AppResult<u64> {
        Ok(self
            .files
            .iter()
            .filter(|f| f.owner == owner && f.parent_folder == Some(folder))
            .count() as u64)
    }
}
