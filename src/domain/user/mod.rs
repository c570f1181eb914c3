// User domain module
// Contains the user entity, its value objects and validation errors

#![allow(clippy::module_inception)]

pub mod errors;
pub mod user;
pub mod value_objects;

// Re-export main types for convenience
pub use errors::{EmailAlreadyExists, UserValidationError};
pub use user::User;
pub use value_objects::{Email, Role};
