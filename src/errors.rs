//! Application error taxonomy
//!
//! Every failure that crosses a layer boundary is an [`AppError`]: a fixed
//! [`ErrorKind`] category, the underlying error, and an appendable context map.
//! The category drives both logging and the HTTP status chosen by the API layer,
//! which is the only place that knows about transport.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Boxed error type used as the source of an [`AppError`]
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Diagnostic key-value pairs attached to an [`AppError`]
pub type Context = BTreeMap<String, Value>;

/// Result alias used by services, repositories and handlers
pub type AppResult<T> = Result<T, AppError>;

/// Category of an application error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Unauthorized,
    Forbidden,
    Internal,
    Database,
    ExternalApi,
    Unprocessable,
}

impl ErrorKind {
    /// Stable code exposed to clients and written to logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::Database => "DATABASE",
            ErrorKind::ExternalApi => "EXTERNAL_API",
            ErrorKind::Unprocessable => "UNPROCESSABLE",
        }
    }

    /// True for categories the client can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound
                | ErrorKind::Validation
                | ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::Unprocessable
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed application error
///
/// # Invariants
/// - The category is fixed at construction; re-classifying produces a new value
/// - Context entries can be added or overwritten but never removed
///
/// # Example
/// ```
/// use saver_api::errors::{AppError, ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "user not found").with_context("id", "42");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.to_string(), "[NOT_FOUND] user not found");
/// ```
#[derive(Debug, Error)]
#[error("[{kind}] {source}")]
pub struct AppError {
    kind: ErrorKind,
    #[source]
    source: BoxError,
    context: Context,
}

impl AppError {
    /// Creates an error from a plain message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            kind,
            source: message.into(),
            context: Context::new(),
        }
    }

    /// Classifies `err` under `kind`
    ///
    /// Wrapping an existing `AppError` keeps its source and context and only
    /// replaces the category.
    pub fn wrap<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        let err: BoxError = err.into();
        match err.downcast::<AppError>() {
            Ok(typed) => Self {
                kind,
                source: typed.source,
                context: typed.context,
            },
            Err(source) => Self {
                kind,
                source,
                context: Context::new(),
            },
        }
    }

    /// Like [`AppError::wrap`], merging `context` into the result
    pub fn wrap_with_context<E>(kind: ErrorKind, err: E, context: Context) -> Self
    where
        E: Into<BoxError>,
    {
        let mut wrapped = Self::wrap(kind, err);
        wrapped.context.extend(context);
        wrapped
    }

    /// Classifies an optional error; `None` stays `None`
    pub fn wrap_option<E>(kind: ErrorKind, err: Option<E>) -> Option<Self>
    where
        E: Into<BoxError>,
    {
        err.map(|err| Self::wrap(kind, err))
    }

    /// Adds a context entry in place and returns the same error for chaining
    pub fn add_context(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Owned variant of [`AppError::add_context`]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_context(key, value);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Message of the underlying error, without the category prefix
    pub fn message(&self) -> String {
        self.source.to_string()
    }

    /// Returns true if the underlying error is of type `E`
    ///
    /// Used to recognise sentinel errors such as a duplicate email without
    /// inspecting message text.
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.source.is::<E>()
    }
}

/// Returns true if `err`, or any error in its source chain, is an
/// [`AppError`] of the given kind. The first `AppError` found decides.
pub fn is_error_kind(err: &(dyn StdError + 'static), kind: ErrorKind) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(app_err) = err.downcast_ref::<AppError>() {
            return app_err.kind() == kind;
        }
        current = err.source();
    }
    false
}

/// Classification adapters for `Result`
///
/// `Ok` values pass through untouched, so a pipeline can classify every step
/// without branching on success.
pub trait ResultExt<T> {
    fn classify(self, kind: ErrorKind) -> AppResult<T>;

    fn classify_with(self, kind: ErrorKind, context: Context) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn classify(self, kind: ErrorKind) -> AppResult<T> {
        self.map_err(|err| AppError::wrap(kind, err))
    }

    fn classify_with(self, kind: ErrorKind, context: Context) -> AppResult<T> {
        self.map_err(|err| AppError::wrap_with_context(kind, err, context))
    }
}
