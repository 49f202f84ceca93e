//! Account profile and administration.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use jotter_core::error::AppError;
use jotter_core::types::{PageRequest, PageResponse};
use jotter_database::UserStore;
use jotter_entity::user::{PublicUser, User};

/// Minimum display-name length in characters.
const NAME_MIN: usize = 2;
/// Maximum display-name length in characters.
const NAME_MAX: usize = 20;

/// Trim a display name and check its length.
pub fn validate_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(AppError::validation(format!(
            "Name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Reads and updates user accounts.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Profile of the calling user.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, AppError> {
        self.get_user(user_id).await
    }

    /// Change the caller's display name.
    pub async fn update_profile(&self, user_id: Uuid, name: &str) -> Result<User, AppError> {
        let name = validate_name(name)?;
        let user = self
            .users
            .update_name(user_id, &name)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Page through live users.
    pub async fn list_users(&self, page: PageRequest) -> Result<PageResponse<PublicUser>, AppError> {
        let page = self.users.list(page.normalized()).await?;
        Ok(PageResponse {
            items: page.items.iter().map(User::to_public).collect(),
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        })
    }

    /// Look up a live user by id.
    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Soft-delete the caller's account.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), AppError> {
        if !self.users.soft_delete(user_id).await? {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use jotter_core::ErrorKind;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Ann ").unwrap(), "Ann");
        assert!(validate_name("A").is_err());
        assert!(validate_name(&"x".repeat(21)).is_err());
        assert!(validate_name(&"é".repeat(20)).is_ok());
    }

    #[tokio::test]
    async fn test_profile_round() {
        let h = Harness::new();
        let user = h.user("a@x.io").await;

        let profile = h.user_service.get_profile(user.id).await.unwrap();
        assert_eq!(profile.email, "a@x.io");

        let updated = h.user_service.update_profile(user.id, " Bea ").await.unwrap();
        assert_eq!(updated.name, "Bea");
        let err = h.user_service.update_profile(user.id, "B").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_deleted_account_disappears() {
        let h = Harness::new();
        let a = h.user("a@x.io").await;
        let b = h.user("b@x.io").await;

        let page = h.user_service.list_users(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 2);

        h.user_service.delete_account(a.id).await.unwrap();
        let page = h.user_service.list_users(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id, b.id);

        let err = h.user_service.get_user(a.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = h.user_service.delete_account(a.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
