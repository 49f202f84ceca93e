//! Notification sender trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::result::AppResult;

/// Sends templated email messages.
///
/// Delivery failures are reported as [`ErrorKind::Delivery`](crate::ErrorKind).
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Render `template` with `vars` and deliver it to `to`.
    async fn send_templated(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        vars: &HashMap<String, String>,
    ) -> AppResult<()>;
}
