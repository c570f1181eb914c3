use super::errors::UserValidationError;
use super::value_objects::{Email, Role};
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// User entity
///
/// Represents a registered account. The `password` field holds the plaintext
/// credential only between construction and the hashing step of the service;
/// everything persisted or returned past that point carries the hash.
///
/// # Invariants
/// - First name, last name and password are non-empty
/// - Email contains both '@' and '.'
/// - Identifier is generated here, never supplied by callers
///
/// # Example
/// ```
/// use saver_api::domain::user::{Role, User};
///
/// let user = User::new("Ada", "Lovelace", "ada@example.com", "secret", Role::Admin)
///     .expect("valid user");
///
/// assert_eq!(user.email().as_str(), "ada@example.com");
/// assert_eq!(user.id().to_string().len(), 36);
/// assert!(!user.is_deleted());
/// ```
#[derive(Clone)]
pub struct User {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: Email,
    password: String,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    role: Role,
}

impl User {
    /// Creates a new User entity
    ///
    /// # Business Rules Enforced
    /// Checked in order, the first failing rule wins:
    /// - First name must not be empty
    /// - Last name must not be empty
    /// - Email must not be empty
    /// - Email must contain '@' and '.'
    /// - Password must not be empty
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let password = password.into();

        if first_name.is_empty() {
            return Err(UserValidationError::FirstNameRequired);
        }

        if last_name.is_empty() {
            return Err(UserValidationError::LastNameRequired);
        }

        let email = Email::new(email)?;

        if password.is_empty() {
            return Err(UserValidationError::PasswordRequired);
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
            role,
        })
    }

    /// Reconstructs a user from stored state without re-running validation
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        first_name: String,
        last_name: String,
        email: Email,
        password: String,
        is_deleted: bool,
        deleted_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        role: Role,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password,
            is_deleted,
            deleted_at,
            created_at,
            updated_at,
            role,
        }
    }

    /// Replaces the stored credential with its hash
    pub fn set_password_hash(&mut self, hash: String) {
        self.password = hash;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored credential; the hash once the service has processed the user
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("is_deleted", &self.is_deleted)
            .field("deleted_at", &self.deleted_at)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("role", &self.role)
            .finish()
    }
}
