//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::FileKind;

/// A file or folder owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Type classification.
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Content size in bytes (0 for folders).
    pub size: i64,
    /// Public reference to the content, or a synthetic folder path.
    pub path: String,
    /// Object-store identifier.
    #[serde(skip_serializing)]
    pub public_id: Option<String>,
    /// Containing folder.
    pub parent_folder: Option<Uuid>,
    /// Owning user. Immutable after creation.
    pub owner: Uuid,
    /// Favorite flag.
    pub is_favorite: bool,
    /// Private flag. Set iff `password_hash` is present.
    pub is_private: bool,
    /// Argon2 hash of the privacy password.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Free-form metadata.
    pub metadata: serde_json::Value,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Check if this record is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// Object-store identifier whose content must be released on delete.
    pub fn stored_content_id(&self) -> Option<&str> {
        if self.is_folder() {
            None
        } else {
            self.public_id.as_deref()
        }
    }

    /// Name given to a duplicate of this file.
    pub fn copy_name(&self) -> String {
        format!("{} (copy)", self.name)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone)]
pub struct CreateFile {
    /// Display name.
    pub name: String,
    /// Type classification.
    pub kind: FileKind,
    /// Content size in bytes.
    pub size: i64,
    /// Public reference or synthetic folder path.
    pub path: String,
    /// Object-store identifier.
    pub public_id: Option<String>,
    /// Containing folder.
    pub parent_folder: Option<Uuid>,
    /// Owning user.
    pub owner: Uuid,
    /// Favorite flag.
    pub is_favorite: bool,
    /// Private flag.
    pub is_private: bool,
    /// Hash of the privacy password.
    pub password_hash: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Free-form metadata.
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: FileKind) -> File {
        let now = Utc::now();
        File {
            id: Uuid::new_v4(),
            name: "report.pdf".into(),
            kind,
            size: 10,
            path: "http://cdn/x".into(),
            public_id: Some("jotter/users/u/report".into()),
            parent_folder: None,
            owner: Uuid::new_v4(),
            is_favorite: false,
            is_private: true,
            password_hash: Some("hash".into()),
            tags: vec![],
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_folders_never_release_content() {
        assert_eq!(sample(FileKind::Folder).stored_content_id(), None);
        assert!(sample(FileKind::Pdf).stored_content_id().is_some());
    }

    #[test]
    fn test_serialization_hides_internal_fields() {
        let json = serde_json::to_value(sample(FileKind::Pdf)).unwrap();
        assert_eq!(json["type"], "pdf");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("publicId").is_none());
        assert_eq!(json["isPrivate"], true);
    }

    #[test]
    fn test_copy_name() {
        assert_eq!(sample(FileKind::Pdf).copy_name(), "report.pdf (copy)");
    }
}
