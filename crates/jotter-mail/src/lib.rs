//! # jotter-mail
//!
//! [`Mailer`](jotter_core::traits::Mailer) implementations and the built-in
//! message templates.

pub mod http;
pub mod log;
pub mod template;

use std::sync::Arc;

use jotter_core::config::mail::MailConfig;
use jotter_core::error::AppError;
use jotter_core::result::AppResult;
use jotter_core::traits::Mailer;

pub use http::HttpMailer;
pub use log::LogMailer;
pub use template::{OTP_EMAIL, RenderedMessage};

/// Build the mailer named by `config.provider`.
pub fn build_mailer(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    match config.provider.as_str() {
        "log" => Ok(Arc::new(LogMailer::new())),
        "http" => Ok(Arc::new(HttpMailer::new(config)?)),
        other => Err(AppError::configuration(format!(
            "Unknown mail provider '{other}'. Expected one of: log, http"
        ))),
    }
}
