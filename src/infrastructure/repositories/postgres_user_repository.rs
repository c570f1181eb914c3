use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tokio::time::timeout;
use uuid::Uuid;

use crate::domain::repositories::UserRepository;
use crate::domain::user::{Email, EmailAlreadyExists, Role, User};
use crate::errors::{AppError, AppResult, ErrorKind};

/// Partial unique index guarding email among non-deleted users
const EMAIL_UNIQUE_INDEX: &str = "users_email_active_key";

/// Default per-query deadline
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL implementation of UserRepository
///
/// Every query runs under a deadline; an expired deadline drops the pending
/// query and surfaces as a `Database` error.
pub struct PostgresUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    /// * `query_timeout` - Deadline applied to each query
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn with_deadline<T, F>(&self, operation: &'static str, query: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(|e| classify_sqlx_error(operation, e)),
            Err(_) => Err(AppError::new(
                ErrorKind::Database,
                format!(
                    "{} timed out after {}ms",
                    operation,
                    self.query_timeout.as_millis()
                ),
            )
            .with_context("operation", operation)),
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    role: String,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&row.email).map_err(|e| {
            AppError::wrap(ErrorKind::Database, e).with_context("user_id", row.id.to_string())
        })?;
        let role = Role::new(&row.role).map_err(|e| {
            AppError::wrap(ErrorKind::Database, e).with_context("user_id", row.id.to_string())
        })?;

        Ok(User::from_persistence(
            row.id,
            row.first_name,
            row.last_name,
            email,
            row.password,
            row.is_deleted,
            row.deleted_at,
            row.created_at,
            row.updated_at,
            role,
        ))
    }
}

fn classify_sqlx_error(operation: &'static str, err: sqlx::Error) -> AppError {
    let duplicate_email = err
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
        == Some(EMAIL_UNIQUE_INDEX);

    if duplicate_email {
        return AppError::wrap(ErrorKind::Database, EmailAlreadyExists)
            .with_context("operation", operation)
            .with_context("constraint", EMAIL_UNIQUE_INDEX);
    }

    AppError::wrap(ErrorKind::Database, err).with_context("operation", operation)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: User) -> AppResult<User> {
        let insert = sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, email, password, role,
                is_deleted, deleted_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.email().as_str())
        .bind(user.password())
        .bind(user.role().as_str())
        .bind(user.is_deleted())
        .bind(user.deleted_at())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool);

        self.with_deadline("create_user", insert).await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let select = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id, first_name, last_name, email, password, role,
                is_deleted, deleted_at, created_at, updated_at
            FROM users
            WHERE email = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool);

        let row = self.with_deadline("find_user_by_email", select).await?;

        row.map(User::try_from).transpose()
    }
}
