//! Typed view of the free-form file metadata column.

use serde::{Deserialize, Serialize};

use jotter_core::traits::StoredObject;

/// Metadata recorded when content is uploaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Declared media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    /// Filename as supplied by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    /// Raw object-store response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<StoredObject>,
}

impl FileMetadata {
    /// Metadata for a freshly stored upload.
    pub fn for_upload(mimetype: &str, original_name: &str, object: StoredObject) -> Self {
        Self {
            mimetype: Some(mimetype.to_string()),
            original_name: Some(original_name.to_string()),
            object: Some(object),
        }
    }

    /// Parse from a stored JSON value, tolerating unknown shapes.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Convert to a JSON value for storage.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
