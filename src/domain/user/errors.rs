use thiserror::Error;

/// Reasons a user cannot be constructed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("first name is required")]
    FirstNameRequired,

    #[error("last name is required")]
    LastNameRequired,

    #[error("email is required")]
    EmailRequired,

    #[error("invalid email format")]
    InvalidEmail,

    #[error("password is required")]
    PasswordRequired,

    #[error("invalid role: {0}")]
    InvalidRole(String),
}

/// Sentinel raised when a registration reuses an email already on file
///
/// Carried as the source of an `AppError` so callers can recognise it with
/// `AppError::is::<EmailAlreadyExists>()` regardless of the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("email already exists")]
pub struct EmailAlreadyExists;
