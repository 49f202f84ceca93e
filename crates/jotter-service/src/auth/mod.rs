//! Credential and session lifecycle.

pub mod service;

pub use service::{AuthService, LoginOutcome, RegisterInput};
