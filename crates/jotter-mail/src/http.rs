//! Mailer that posts rendered messages to an HTTP relay.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use jotter_core::config::mail::MailConfig;
use jotter_core::error::{AppError, ErrorKind};
use jotter_core::result::AppResult;
use jotter_core::traits::Mailer;

use crate::template::render;

/// Sends email through a JSON relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: Sender,
}

#[derive(Debug, Clone, Serialize)]
struct Sender {
    name: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    from: &'a Sender,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

impl HttpMailer {
    /// Creates a mailer for `config.endpoint`.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AppError::configuration("mail.endpoint is required for http mail"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build mail client", e)
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            from: Sender {
                name: config.from_name.clone(),
                email: config.from_email.clone(),
            },
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_templated(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        vars: &HashMap<String, String>,
    ) -> AppResult<()> {
        let message = render(template, vars)?;
        let body = OutboundMessage {
            from: &self.from,
            to,
            subject,
            html: &message.html,
            text: &message.text,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(to, error = %e, "Email relay unreachable");
            AppError::with_source(ErrorKind::Delivery, "Failed to send email", e)
        })?;

        if !response.status().is_success() {
            warn!(to, status = %response.status(), "Email relay rejected message");
            return Err(AppError::delivery(format!(
                "Failed to send email: relay returned {}",
                response.status()
            )));
        }

        debug!(to, subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> MailConfig {
        MailConfig {
            provider: "http".into(),
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_required() {
        assert!(HttpMailer::new(&config("")).is_err());
    }

    #[test]
    fn test_payload_shape() {
        let from = Sender {
            name: "Jotter".into(),
            email: "no-reply@jotter.local".into(),
        };
        let body = OutboundMessage {
            from: &from,
            to: "a@x.io",
            subject: "Password Reset OTP",
            html: "<p>1</p>",
            text: "1",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["from"]["email"], "no-reply@jotter.local");
        assert_eq!(json["subject"], "Password Reset OTP");
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_delivery_error() {
        let mailer = HttpMailer::new(&config("http://127.0.0.1:9/send")).unwrap();
        let vars = HashMap::from([("otp".to_string(), "123456".to_string())]);
        let err = mailer
            .send_templated("a@x.io", "Password Reset OTP", crate::OTP_EMAIL, &vars)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Delivery);
    }
}
