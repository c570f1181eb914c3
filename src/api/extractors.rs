//! JSON extractor with automatic validation using the validator crate.

use axum::{
    async_trait,
    extract::{FromRequest, Json, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::errors::{AppError, ErrorKind};

/// JSON extractor with automatic validation.
///
/// Decode failures and rule violations are both rejected as
/// `ErrorKind::Validation`. Violations list every offending field with the
/// codes of the rules it failed under the `fields` context key.
///
/// # Example
/// ```ignore
/// use saver_api::api::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     payload.email
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::new(ErrorKind::Validation, "invalid request body")
                .with_context("reason", rejection.body_text())
        })?;

        data.validate().map_err(validation_error)?;

        Ok(ValidatedJson(data))
    }
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let fields: Map<String, Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let codes: Vec<Value> = errors
                .iter()
                .map(|err| Value::String(err.code.to_string()))
                .collect();
            (field.to_string(), Value::Array(codes))
        })
        .collect();

    AppError::new(ErrorKind::Validation, "request validation failed")
        .with_context("fields", Value::Object(fields))
}
