//! Length policy for account passwords.

use jotter_core::config::auth::AuthConfig;
use jotter_core::error::AppError;

/// Enforces the configured password length bounds.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_bounds(config.password_min_length, config.password_max_length)
    }

    /// Creates a policy with explicit bounds.
    pub fn with_bounds(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Checks the trimmed length in characters.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let len = password.trim().chars().count();
        if len < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if len > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be at most {} characters long",
                self.max_length
            )));
        }
        Ok(())
    }
}
