use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::state::AppState;
use crate::domain::user::{EmailAlreadyExists, User};
use crate::errors::{AppError, ErrorKind};

/// Request body for user registration
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "password_length"))]
    pub password: String,
}

const PASSWORD_MIN_BYTES: usize = 8;
const PASSWORD_MAX_BYTES: usize = 32;

/// Password length in bytes, not characters; keeps every accepted password
/// within bcrypt's input limit
fn password_length(password: &str) -> Result<(), ValidationError> {
    if (PASSWORD_MIN_BYTES..=PASSWORD_MAX_BYTES).contains(&password.len()) {
        return Ok(());
    }

    let mut err = ValidationError::new("length");
    err.add_param("min".into(), &PASSWORD_MIN_BYTES);
    err.add_param("max".into(), &PASSWORD_MAX_BYTES);
    err.add_param("value_bytes".into(), &password.len());
    Err(err)
}

/// Public view of a user; never carries the credential or role
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            email: user.email().as_str().to_string(),
        }
    }
}

/// Register a new user
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state
        .users
        .create_user(&req.first_name, &req.last_name, &req.email, &req.password)
        .await
        .map_err(present)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Decides how a service failure reaches the client
///
/// The service already logged it. Client-side categories, the duplicate-email
/// sentinel included, pass through unchanged; anything else becomes
/// `Internal`.
fn present(err: AppError) -> AppError {
    if err.is::<EmailAlreadyExists>() || err.kind().is_client_error() {
        return err;
    }

    tracing::error!(kind = %err.kind(), error = %err, "Failed to create user");
    AppError::wrap(ErrorKind::Internal, err)
}
