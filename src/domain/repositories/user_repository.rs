use async_trait::async_trait;

use crate::domain::user::User;
use crate::errors::AppResult;

/// Repository trait for User persistence
///
/// Failures are returned already classified as `ErrorKind::Database`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it unchanged
    async fn create_user(&self, user: User) -> AppResult<User>;

    /// Find a non-deleted user by email address
    ///
    /// `Ok(None)` means no such user; `Err` is reserved for storage failures.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
}
