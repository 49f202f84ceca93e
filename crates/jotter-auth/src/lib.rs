//! # jotter-auth
//!
//! Credential primitives for Jotter.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token creation and validation
//! - `password`: Argon2id password hashing and policy enforcement
//! - `otp`: six-digit password-reset codes

pub mod jwt;
pub mod otp;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use otp::OtpGenerator;
pub use password::{PasswordHasher, PasswordPolicy};
