//! # jotter-service
//!
//! Business logic service layer for Jotter. Services hold their
//! collaborators behind `Arc` and depend only on the store, object-store,
//! and mailer traits, so any backend can be wired in.

pub mod auth;
pub mod file;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthService, LoginOutcome, RegisterInput};
pub use file::{FileService, FileServiceLimits, UploadInput};
pub use user::UserService;
