use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::UserRepository;
use crate::domain::user::{EmailAlreadyExists, User};
use crate::errors::{AppError, AppResult, ErrorKind};

/// In-memory implementation of UserRepository (for development/testing)
///
/// Mirrors the storage constraints of the PostgreSQL schema: an email may
/// only be used by one non-deleted user.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Looks up a stored user by id
    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        let email_taken = users
            .values()
            .any(|u| !u.is_deleted() && u.email() == user.email());
        if email_taken {
            return Err(AppError::wrap(ErrorKind::Database, EmailAlreadyExists)
                .with_context("operation", "create_user"));
        }

        if users.contains_key(&user.id()) {
            return Err(AppError::new(ErrorKind::Database, "duplicate user id")
                .with_context("operation", "create_user"));
        }

        users.insert(user.id(), user.clone());

        tracing::debug!(user_id = %user.id(), "Stored user in memory");
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| !u.is_deleted() && u.email().as_str() == email)
            .cloned())
    }
}
