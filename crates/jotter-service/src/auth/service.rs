//! Registration, login, token refresh, and password recovery.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use jotter_auth::{JwtDecoder, JwtEncoder, OtpGenerator, PasswordHasher, PasswordPolicy, TokenPair};
use jotter_core::config::auth::AuthConfig;
use jotter_core::error::AppError;
use jotter_core::traits::Mailer;
use jotter_database::UserStore;
use jotter_entity::user::{CreateUser, PublicUser, ResetState, User};

use crate::user::service::validate_name;

/// Subject line of the reset-code email.
const RESET_SUBJECT: &str = "Password Reset OTP";

/// Template rendered for the reset-code email.
const RESET_TEMPLATE: &str = "otp_email";

/// Fields supplied at registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenPair,
    /// Account email.
    pub email: String,
    /// Account id.
    pub user_id: Uuid,
}

/// Manages account creation, credential checks, and the reset flow.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    otp: OtpGenerator,
    default_quota: i64,
}

/// Trim and lowercase an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` shape check; full validation happens at the API edge.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        config: &AuthConfig,
        default_quota: i64,
    ) -> Self {
        Self {
            users,
            mailer,
            encoder,
            decoder,
            hasher: PasswordHasher::new(),
            policy: PasswordPolicy::new(config),
            otp: OtpGenerator::new(config.otp_ttl_minutes),
            default_quota,
        }
    }

    /// Looks up a live user by email, failing with `NotFound`.
    async fn require_user(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found("User not found with this email"))
    }

    /// Creates an account and returns its public identity.
    pub async fn register(&self, input: RegisterInput) -> Result<PublicUser, AppError> {
        let name = validate_name(&input.name)?;
        let email = normalize_email(&input.email);
        if !is_plausible_email(&email) {
            return Err(AppError::validation("Invalid email address"));
        }
        self.policy.validate(&input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .users
            .create(&CreateUser {
                name,
                email,
                password_hash,
                storage_limit: self.default_quota,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user.to_public())
    }

    /// Verifies credentials and issues an access/refresh pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = self.pre_validate_user(email).await?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::authentication("Password is incorrect"));
        }

        let tokens = self.encoder.issue_pair(user.id, &user.email)?;
        info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome {
            tokens,
            email: user.email,
            user_id: user.id,
        })
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(String, DateTime<Utc>), AppError> {
        let claims = self.decoder.decode_refresh(refresh_token)?;
        let user = self.pre_validate_user(&claims.email).await?;
        if user.id != claims.user_id {
            return Err(AppError::authentication("You are not authorized"));
        }
        self.encoder.issue_access(user.id, &user.email)
    }

    /// Resolves the live user behind an access token.
    pub async fn authenticate(&self, access_token: &str) -> Result<User, AppError> {
        let claims = self.decoder.decode_access(access_token)?;
        let user = self.pre_validate_user(&claims.email).await?;
        if user.id != claims.user_id {
            return Err(AppError::authentication("You are not authorized"));
        }
        Ok(user)
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.pre_validate_user(email).await?;
        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::authentication("Current password is incorrect"));
        }
        self.policy.validate(new_password)?;

        let hash = self.hasher.hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Issues a reset code, stores it, and emails it.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let user = self.require_user(email).await?;
        let (code, expires_at) = self.otp.issue();
        self.users.set_reset_otp(user.id, &code, expires_at).await?;

        let vars = HashMap::from([
            ("otp".to_string(), code),
            ("minutes".to_string(), self.otp.ttl_minutes().to_string()),
        ]);
        self.mailer
            .send_templated(&user.email, RESET_SUBJECT, RESET_TEMPLATE, &vars)
            .await?;

        info!(user_id = %user.id, %expires_at, "Password reset code sent");
        Ok(())
    }

    /// Checks a reset code and marks it verified.
    ///
    /// Expired codes are rejected.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(), AppError> {
        let user = self.require_user(email).await?;
        let stored = match (&user.reset_otp, user.reset_state()) {
            (Some(stored), ResetState::OtpIssued { .. } | ResetState::OtpVerified) => stored,
            _ => return Err(AppError::authentication("Invalid OTP")),
        };
        if !OtpGenerator::matches(stored, code) {
            return Err(AppError::authentication("Invalid OTP"));
        }
        if !OtpGenerator::is_live(user.reset_otp_expires_at) {
            return Err(AppError::authentication("OTP has expired"));
        }

        self.users.mark_otp_verified(user.id).await?;
        info!(user_id = %user.id, "Password reset code verified");
        Ok(())
    }

    /// Sets a new password once the reset code has been verified.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AppError> {
        let user = self.require_user(email).await?;
        if !user.reset_state().permits_reset() {
            return Err(AppError::authentication("OTP not verified"));
        }
        self.policy.validate(new_password)?;

        let hash = self.hasher.hash_password(new_password)?;
        self.users.reset_password(user.id, &hash).await?;
        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Confirms that a live user with this email exists.
    pub async fn pre_validate_user(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::authentication("You are not authorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, RecordingMailer, auth_config};
    use chrono::Duration;
    use jotter_core::ErrorKind;

    fn register_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: "Ann".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let h = Harness::new();
        let public = h
            .auth
            .register(register_input("A@x.io", "secret1"))
            .await
            .unwrap();
        assert_eq!(public.email, "a@x.io");
        assert_eq!(public.name, "Ann");
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());

        let outcome = h.auth.login("a@x.io", "secret1").await.unwrap();
        assert_eq!(outcome.email, "a@x.io");
        assert_eq!(outcome.user_id, public.id);
        assert!(!outcome.tokens.access_token.is_empty());
        assert_ne!(outcome.tokens.access_token, outcome.tokens.refresh_token);

        let stored = h.users.find_by_email("a@x.io").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert_eq!(stored.storage_limit, 16_106_127_360);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let err = h
            .auth
            .register(register_input(" A@X.IO ", "secret2"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let h = Harness::new();
        let err = h.auth.register(register_input("a@x.io", "123")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let mut input = register_input("b@x.io", "secret1");
        input.name = "A".into();
        assert_eq!(h.auth.register(input).await.unwrap_err().kind, ErrorKind::Validation);
    }

    #[test]
    fn test_email_shape() {
        assert!(is_plausible_email("a@x.io"));
        assert!(!is_plausible_email("a@x"));
        assert!(!is_plausible_email("@x.io"));
        assert!(!is_plausible_email("a@@x.io"));
    }

    #[tokio::test]
    async fn test_login_failures_are_authentication_errors() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let wrong = h.auth.login("a@x.io", "nope123").await.unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::Authentication);
        let missing = h.auth.login("b@x.io", "secret1").await.unwrap_err();
        assert_eq!(missing.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_authenticate_and_refresh() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let outcome = h.auth.login("a@x.io", "secret1").await.unwrap();

        let user = h.auth.authenticate(&outcome.tokens.access_token).await.unwrap();
        assert_eq!(user.id, outcome.user_id);
        assert!(h.auth.authenticate(&outcome.tokens.refresh_token).await.is_err());

        let (access, _) = h.auth.refresh(&outcome.tokens.refresh_token).await.unwrap();
        assert!(h.auth.authenticate(&access).await.is_ok());
    }

    #[tokio::test]
    async fn test_tokens_for_another_user_id_are_rejected() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let forged = JwtEncoder::new(&auth_config())
            .issue_pair(Uuid::new_v4(), "a@x.io")
            .unwrap();

        let err = h.auth.authenticate(&forged.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        let err = h.auth.refresh(&forged.refresh_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_deleted_user_cannot_authenticate() {
        let h = Harness::new();
        let public = h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let outcome = h.auth.login("a@x.io", "secret1").await.unwrap();
        h.users.soft_delete(public.id).await.unwrap();

        let err = h.auth.authenticate(&outcome.tokens.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(h.auth.login("a@x.io", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn test_change_password_requires_current() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let err = h
            .auth
            .change_password("a@x.io", "wrong12", "newpass1")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        h.auth.change_password("a@x.io", "secret1", "newpass1").await.unwrap();
        assert!(h.auth.login("a@x.io", "newpass1").await.is_ok());
        assert!(h.auth.login("a@x.io", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn test_reset_flow() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();

        let err = h.auth.reset_password("a@x.io", "newpass1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        h.auth.forgot_password("a@x.io").await.unwrap();
        let sent = h.mailer.last().unwrap();
        assert_eq!(sent.to, "a@x.io");
        assert_eq!(sent.subject, "Password Reset OTP");
        let code = sent.vars["otp"].clone();
        assert_eq!(code.len(), 6);
        assert_eq!(sent.vars["minutes"], "15");

        let err = h.auth.verify_otp("a@x.io", "000000").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(
            h.auth.reset_password("a@x.io", "newpass1").await.unwrap_err().kind,
            ErrorKind::Authentication
        );

        h.auth.verify_otp("a@x.io", &code).await.unwrap();
        h.auth.reset_password("a@x.io", "newpass1").await.unwrap();
        assert!(h.auth.login("a@x.io", "newpass1").await.is_ok());

        let user = h.users.find_by_email("a@x.io").await.unwrap().unwrap();
        assert_eq!(user.reset_state(), ResetState::NoReset);

        // A second reset needs a fresh verification.
        let err = h.auth.reset_password("a@x.io", "another1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_new_code_clears_previous_verification() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        h.auth.forgot_password("a@x.io").await.unwrap();
        let code = h.mailer.last().unwrap().vars["otp"].clone();
        h.auth.verify_otp("a@x.io", &code).await.unwrap();

        h.auth.forgot_password("a@x.io").await.unwrap();
        let err = h.auth.reset_password("a@x.io", "newpass1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_expired_code_rejected() {
        let h = Harness::new();
        let public = h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        h.users
            .set_reset_otp(public.id, "123456", Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        let err = h.auth.verify_otp("a@x.io", "123456").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "OTP has expired");
    }

    #[tokio::test]
    async fn test_verify_without_code_and_unknown_user() {
        let h = Harness::new();
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let err = h.auth.verify_otp("a@x.io", "123456").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        let err = h.auth.verify_otp("b@x.io", "123456").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = h.auth.forgot_password("b@x.io").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delivery_failure_propagates() {
        let h = Harness::with_mailer(RecordingMailer::failing());
        h.auth.register(register_input("a@x.io", "secret1")).await.unwrap();
        let err = h.auth.forgot_password("a@x.io").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Delivery);
    }

    #[tokio::test]
    async fn test_pre_validate_user() {
        let h = Harness::new();
        let err = h.auth.pre_validate_user("ghost@x.io").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "You are not authorized");
    }
}
