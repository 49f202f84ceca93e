//! Password-reset flow state.

use chrono::{DateTime, Utc};

/// Where a user stands in the forgot/verify/reset sequence.
///
/// `NoReset -> OtpIssued -> OtpVerified -> NoReset`. Issuing a new code
/// from any state returns to `OtpIssued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    /// No code outstanding.
    NoReset,
    /// A code was issued and awaits verification.
    OtpIssued {
        /// Expiry of the outstanding code.
        expires_at: Option<DateTime<Utc>>,
    },
    /// The code was verified; the password may now be reset.
    OtpVerified,
}

impl ResetState {
    /// Whether `ResetPassword` is permitted.
    pub fn permits_reset(&self) -> bool {
        matches!(self, Self::OtpVerified)
    }
}
