//! Password-reset one-time codes.

use chrono::{DateTime, Duration, Utc};

/// Issues six-digit numeric reset codes with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct OtpGenerator {
    ttl: Duration,
}

impl OtpGenerator {
    /// Creates a generator whose codes expire after `ttl_minutes`.
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Minutes a fresh code stays valid.
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl.num_minutes()
    }

    /// Returns a fresh code in `100000..=999999` and its expiry.
    pub fn issue(&self) -> (String, DateTime<Utc>) {
        let code: u32 = rand::random_range(100_000..=999_999);
        (code.to_string(), Utc::now() + self.ttl)
    }

    /// Whether `supplied` matches `stored`, compared in constant time.
    pub fn matches(stored: &str, supplied: &str) -> bool {
        let supplied = supplied.trim();
        if stored.len() != supplied.len() {
            return false;
        }
        stored
            .bytes()
            .zip(supplied.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Whether a code expiring at `expires_at` is still accepted now.
    pub fn is_live(expires_at: Option<DateTime<Utc>>) -> bool {
        expires_at.is_some_and(|at| Utc::now() < at)
    }
}
