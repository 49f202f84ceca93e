//! Mailer that writes messages to the tracing log.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use jotter_core::result::AppResult;
use jotter_core::traits::Mailer;

use crate::template::render;

/// Development mailer. Nothing leaves the process.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Creates a log mailer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_templated(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        vars: &HashMap<String, String>,
    ) -> AppResult<()> {
        let message = render(template, vars)?;
        info!(to, subject, template, body = %message.text, "Email (log transport)");
        Ok(())
    }
}
