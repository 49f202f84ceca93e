//! File and folder domain entities.

pub mod filter;
pub mod kind;
pub mod metadata;
pub mod model;

pub use filter::{FileFilter, FileSortField};
pub use kind::FileKind;
pub use metadata::FileMetadata;
pub use model::{CreateFile, File};
