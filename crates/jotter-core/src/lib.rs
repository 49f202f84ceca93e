//! # jotter-core
//!
//! Core crate for Jotter. Contains the unified error system, configuration
//! schemas, the object-store and mailer seams, and pagination/sorting types.
//!
//! This crate has **no** internal dependencies on other Jotter crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
