//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use jotter_core::types::SortDirection;
use jotter_entity::file::{FileFilter, FileKind, FileSortField};

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 2, max = 20, message = "Name must be between 2 and 20 characters"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body. Falls back to the `refreshToken` cookie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Forgot-password request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Account email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Reset-code verification body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// Account email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Six-digit code from the email.
    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,
}

/// Password reset body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Account email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// New password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Profile update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[validate(length(min = 2, max = 20, message = "Name must be between 2 and 20 characters"))]
    pub name: String,
}

/// Folder creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    /// Containing folder.
    pub parent_folder: Option<Uuid>,
}

/// Privacy toggle body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TogglePrivateRequest {
    /// Privacy password.
    pub password: Option<String>,
}

/// Rename body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileRequest {
    /// New display name.
    #[validate(length(min = 1, max = 255, message = "New name is required"))]
    pub new_name: String,
}

/// Query string for `GET /api/files`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    /// Type filter.
    #[serde(rename = "type")]
    pub kind: Option<FileKind>,
    /// Only favorites.
    #[serde(default)]
    pub favorite_only: bool,
    /// Case-insensitive name substring.
    pub search_term: Option<String>,
    /// Direct children of this folder.
    pub parent_folder_id: Option<Uuid>,
    /// Creation day, `YYYY-MM-DD` in UTC.
    pub date: Option<NaiveDate>,
    /// Ordering field.
    pub sort_field: Option<FileSortField>,
    /// Ordering direction.
    pub sort_direction: Option<SortDirection>,
}

impl From<ListFilesQuery> for FileFilter {
    fn from(query: ListFilesQuery) -> Self {
        Self {
            kind: query.kind,
            favorite_only: query.favorite_only,
            search_term: query.search_term,
            parent_folder: query.parent_folder_id,
            date: query.date,
            sort_field: query.sort_field.unwrap_or_default(),
            sort_direction: query.sort_direction.unwrap_or_default(),
        }
    }
}
