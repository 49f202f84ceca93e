//! Built-in message templates with `{{name}}` placeholders.

use std::collections::HashMap;

use jotter_core::error::AppError;

/// Template name for the password-reset code email.
pub const OTP_EMAIL: &str = "otp_email";

const OTP_EMAIL_HTML: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #222;">
    <h2>Password reset</h2>
    <p>Use the code below to reset your Jotter password.</p>
    <p style="font-size: 28px; letter-spacing: 6px; font-weight: bold;">{{otp}}</p>
    <p>This code is valid for {{minutes}} minutes. If you did not request a reset, ignore this email.</p>
  </body>
</html>
"#;

const OTP_EMAIL_TEXT: &str =
    "Your OTP for password reset is: {{otp}}. This OTP is valid for {{minutes}} minutes.";

/// HTML body plus plain-text fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// HTML body.
    pub html: String,
    /// Plain-text body.
    pub text: String,
}

/// Render the named template, substituting every `{{key}}` from `vars`.
pub fn render(template: &str, vars: &HashMap<String, String>) -> Result<RenderedMessage, AppError> {
    let (html, text) = match template {
        OTP_EMAIL => (OTP_EMAIL_HTML, OTP_EMAIL_TEXT),
        other => {
            return Err(AppError::internal(format!("Unknown email template '{other}'")));
        }
    };
    Ok(RenderedMessage {
        html: substitute(html, vars, true),
        text: substitute(text, vars, false),
    })
}

fn substitute(source: &str, vars: &HashMap<String, String>, escape: bool) -> String {
    let mut out = source.to_string();
    for (key, value) in vars {
        let value = if escape {
            escape_html(value)
        } else {
            value.clone()
        };
        out = out.replace(&format!("{{{{{key}}}}}"), &value);
    }
    out
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
