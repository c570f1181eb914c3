use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::UserValidationError;

/// Email value object representing a syntactically plausible address
///
/// # Invariants
/// - Must not be empty
/// - Must contain both '@' and '.'
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Returns
    /// * `Ok(Email)` - If email is valid
    /// * `Err(UserValidationError::EmailRequired)` - If email is empty
    /// * `Err(UserValidationError::InvalidEmail)` - If '@' or '.' is missing
    ///
    /// # Example
    /// ```
    /// use saver_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("test@example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "test@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.is_empty() {
            return Err(UserValidationError::EmailRequired);
        }
        if !Self::is_valid(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Email(email))
    }

    fn is_valid(email: &str) -> bool {
        email.contains('@') && email.contains('.')
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role label stored with every user
///
/// Parsing is case-insensitive; the canonical form is upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Root,
    Admin,
    CommonUser,
}

impl Role {
    /// Parses a role name, normalising case
    ///
    /// # Example
    /// ```
    /// use saver_api::domain::user::value_objects::Role;
    ///
    /// assert_eq!(Role::new("admin").unwrap(), Role::Admin);
    /// assert!(Role::new("SUPERUSER").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self, UserValidationError> {
        match input.to_uppercase().as_str() {
            "ROOT" => Ok(Role::Root),
            "ADMIN" => Ok(Role::Admin),
            "COMMON_USER" => Ok(Role::CommonUser),
            _ => Err(UserValidationError::InvalidRole(input.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Root => "ROOT",
            Role::Admin => "ADMIN",
            Role::CommonUser => "COMMON_USER",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::new(s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
