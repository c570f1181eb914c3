use std::sync::Arc;

use tokio::task;

use crate::domain::repositories::UserRepository;
use crate::domain::user::{EmailAlreadyExists, Role, User};
use crate::errors::{AppError, AppResult, ErrorKind, ResultExt};
use crate::security::password::CredentialHasher;

/// Service layer for user registration
///
/// Orchestrates entity validation, the duplicate-email check, hashing and
/// persistence. Every failure is classified and logged here, so callers only
/// decide how to present it.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Registers a new user with the default role
    ///
    /// # Errors
    /// - `Validation` when the entity rules fail
    /// - `Validation` with an [`EmailAlreadyExists`] source when the email is taken
    /// - `Database` when the lookup or insert fails
    /// - `Internal` when hashing fails
    ///
    /// The returned user carries the password hash, never the plaintext.
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        let mut user = User::new(first_name, last_name, email, password, Role::CommonUser)
            .map_err(|e| {
                tracing::warn!(step = "build_user", error = %e, "Rejected invalid user data");
                AppError::wrap(ErrorKind::Validation, e).with_context("step", "build_user")
            })?;

        let existing = self
            .repository
            .find_user_by_email(user.email().as_str())
            .await
            .map_err(|e| {
                tracing::error!(
                    step = "find_user_by_email",
                    error = %e,
                    context = ?e.context(),
                    "Failed to look up user by email"
                );
                AppError::wrap(ErrorKind::Database, e).with_context("step", "find_user_by_email")
            })?;

        if existing.is_some() {
            tracing::warn!(
                step = "check_duplicate_email",
                email = %user.email(),
                "Email already registered"
            );
            return Err(duplicate_email(&user));
        }

        let hash = self.hash_password(user.password().to_owned()).await.map_err(|e| {
            tracing::error!(step = "hash_password", error = %e, "Failed to hash password");
            e.with_context("step", "hash_password")
        })?;
        user.set_password_hash(hash);

        let created = match self.repository.create_user(user).await {
            Ok(created) => created,
            Err(e) if e.is::<EmailAlreadyExists>() => {
                tracing::warn!(
                    step = "create_user",
                    context = ?e.context(),
                    "Email registered concurrently"
                );
                return Err(AppError::wrap(ErrorKind::Validation, e).with_context("step", "create_user"));
            }
            Err(e) => {
                tracing::error!(
                    step = "create_user",
                    error = %e,
                    context = ?e.context(),
                    "Failed to persist user"
                );
                return Err(AppError::wrap(ErrorKind::Database, e).with_context("step", "create_user"));
            }
        };

        tracing::info!(user_id = %created.id(), "User created");
        Ok(created)
    }

    /// Runs the hasher on the blocking pool so a slow hash never stalls the
    /// async workers
    async fn hash_password(&self, plaintext: String) -> AppResult<String> {
        let hasher = Arc::clone(&self.hasher);
        task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .classify(ErrorKind::Internal)?
            .classify(ErrorKind::Internal)
    }
}

fn duplicate_email(user: &User) -> AppError {
    AppError::wrap(ErrorKind::Validation, EmailAlreadyExists)
        .with_context("step", "check_duplicate_email")
        .with_context("email", user.email().as_str())
}
