//! Outbound email configuration.

use serde::{Deserialize, Serialize};

/// Mail transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// `"log"` writes messages to the tracing log, `"http"` posts them to a relay.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Relay endpoint accepting JSON messages.
    #[serde(default)]
    pub endpoint: String,
    /// Bearer key for the relay.
    #[serde(default)]
    pub api_key: String,
    /// Display name of the sender.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Relay request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: String::new(),
            api_key: String::new(),
            from_name: default_from_name(),
            from_email: default_from_email(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from_name() -> String {
    "Jotter".to_string()
}

fn default_from_email() -> String {
    "no-reply@jotter.local".to_string()
}

fn default_timeout() -> u64 {
    10
}
