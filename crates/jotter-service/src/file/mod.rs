//! File and folder lifecycle.

pub mod content;
pub mod service;

pub use service::{FileService, FileServiceLimits, UploadInput};
