//! Account profile operations.

pub mod service;

pub use service::UserService;
