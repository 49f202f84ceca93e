//! Core type definitions used across the Jotter workspace.

pub mod pagination;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse};
pub use sorting::SortDirection;
