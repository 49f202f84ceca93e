//! File type classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of file types. Folders share the file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `image/*`.
    Image,
    /// `application/pdf`.
    Pdf,
    /// `text/*` other than HTML.
    Text,
    /// A folder node. Never produced by [`FileKind::from_mime`].
    Folder,
    /// `text/html`.
    Html,
    /// Anything else.
    Other,
}

impl FileKind {
    /// Classify a declared media type.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Self::Pdf,
            "text/html" => Self::Html,
            m if m.starts_with("image/") => Self::Image,
            m if m.starts_with("text/") => Self::Text,
            _ => Self::Other,
        }
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Folder => "folder",
            Self::Html => "html",
            Self::Other => "other",
        }
    }

    /// Check if this kind is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = jotter_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "pdf" => Ok(Self::Pdf),
            "text" => Ok(Self::Text),
            "folder" => Ok(Self::Folder),
            "html" => Ok(Self::Html),
            "other" => Ok(Self::Other),
            _ => Err(jotter_core::AppError::validation(format!(
                "Invalid file type: '{s}'. Expected one of: image, pdf, text, folder, html, other"
            ))),
        }
    }
}
