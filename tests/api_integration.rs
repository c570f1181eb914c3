//! End-to-end API integration tests
//!
//! These tests drive the complete HTTP router against the in-memory
//! repository, covering:
//! - User registration and the public response shape
//! - Request validation and its error bodies
//! - Error classification for storage and hashing failures
//! - Logging side effects of failure handling

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use saver_api::api::{self, AppState};
use saver_api::domain::repositories::UserRepository;
use saver_api::domain::user::User;
use saver_api::errors::{AppError, AppResult, ErrorKind};
use saver_api::infrastructure::repositories::InMemoryUserRepository;
use saver_api::security::{BcryptHasher, CredentialHasher};
use saver_api::services::UserService;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

use common::capture_logs;

/// Lowest bcrypt cost; keeps the tests fast
const TEST_COST: u32 = 4;

/// Setup test application backed by the given repository and hasher
fn setup_app(repository: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Router {
    api::router(AppState::new(UserService::new(repository, hasher)))
}

fn setup_in_memory() -> (Router, InMemoryUserRepository) {
    let repo = InMemoryUserRepository::new();
    let app = setup_app(
        Arc::new(repo.clone()),
        Arc::new(BcryptHasher::with_cost(TEST_COST)),
    );
    (app, repo)
}

/// Repository whose lookups always fail; counts insert attempts
#[derive(Default)]
struct UnavailableRepository {
    inserts: AtomicUsize,
}

#[async_trait]
impl UserRepository for UnavailableRepository {
    async fn create_user(&self, user: User) -> AppResult<User> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(user)
    }

    async fn find_user_by_email(&self, _email: &str) -> AppResult<Option<User>> {
        Err(AppError::new(ErrorKind::Database, "connection refused")
            .with_context("operation", "find_user_by_email"))
    }
}

fn register_request(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

fn payload(email: &str, password: &str) -> Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": email,
        "password": password
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn assert_generic_500(status: StatusCode, json: &Value) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        &json!({
            "code": "INTERNAL_SERVER_ERROR",
            "message": "An unexpected error occurred"
        })
    );
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup_in_memory();

    for uri in ["/health", "/ping"] {
        let (status, json) = send(
            &app,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "message": "ok" }));
    }
}

#[tokio::test]
async fn test_register_user() {
    let (app, repo) = setup_in_memory();

    let (status, json) = send(
        &app,
        register_request(&payload("john.doe@example.com", "password123")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["first_name"], "John");
    assert_eq!(json["last_name"], "Doe");
    assert_eq!(json["email"], "john.doe@example.com");
    assert_eq!(json["id"].as_str().unwrap().len(), 36);
    assert!(json.get("password").is_none());
    assert!(json.get("role").is_none());
    assert_eq!(json.as_object().unwrap().len(), 4);

    // The stored credential is a hash of the submitted password
    let id = json["id"].as_str().unwrap().parse().unwrap();
    let stored = repo.get(id).await.expect("user persisted");
    assert_ne!(stored.password(), "password123");
    assert!(BcryptHasher::with_cost(TEST_COST).verify(stored.password(), "password123"));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_duplicate_email_is_validation_error_logged_once() {
    let (app, repo) = setup_in_memory();
    let body = payload("existing@example.com", "password123");

    let (status, _) = send(&app, register_request(&body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (logs, _guard) = capture_logs();
    let (status, json) = send(&app, register_request(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
    assert_eq!(json["message"], "email already exists");
    assert_eq!(json["details"]["email"], "existing@example.com");
    assert_eq!(repo.len().await, 1);

    let problems = logs.problems();
    assert_eq!(problems.len(), 1, "unexpected log lines: {problems:?}");
    assert_eq!(problems[0].message, "Email already registered");
    assert_eq!(problems[0].fields["email"], "existing@example.com");
    assert_eq!(problems[0].fields["step"], "check_duplicate_email");
}

#[tokio::test]
async fn test_password_length_bounds() {
    let (app, _) = setup_in_memory();

    for (i, password) in ["a".repeat(7), "a".repeat(33)].iter().enumerate() {
        let email = format!("short-{i}@example.com");
        let (status, json) = send(&app, register_request(&payload(&email, password))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION");
        assert!(json["details"]["fields"]["password"].is_array());
    }

    for (i, password) in ["a".repeat(8), "a".repeat(32)].iter().enumerate() {
        let email = format!("ok-{i}@example.com");
        let (status, _) = send(&app, register_request(&payload(&email, password))).await;

        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_password_length_is_measured_in_bytes() {
    let (app, repo) = setup_in_memory();

    // 20 characters but 40 bytes
    let (status, json) = send(
        &app,
        register_request(&payload("multibyte@example.com", &"é".repeat(20))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
    assert_eq!(json["details"]["fields"]["password"], json!(["length"]));
    assert!(repo.is_empty().await);

    // 8 characters, exactly 32 bytes
    let (status, _) = send(
        &app,
        register_request(&payload("crab@example.com", &"🦀".repeat(8))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_field_violations_name_each_field() {
    let (app, repo) = setup_in_memory();

    let (status, json) = send(
        &app,
        register_request(&json!({
            "first_name": "",
            "last_name": "Doe",
            "email": "not-an-email",
            "password": "password123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
    let fields = json["details"]["fields"].as_object().unwrap();
    assert!(fields.contains_key("first_name"));
    assert!(fields.contains_key("email"));
    assert!(!fields.contains_key("last_name"));
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let (app, _) = setup_in_memory();

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{\"first_name\": \"John\""))
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
    assert!(json["details"]["reason"].is_string());
}

#[tokio::test]
async fn test_missing_field_is_validation_error() {
    let (app, _) = setup_in_memory();

    let (status, json) = send(
        &app,
        register_request(&json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "john.doe@example.com"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
}

#[tokio::test]
async fn test_email_rejected_by_entity_rules_stays_client_error() {
    let (app, repo) = setup_in_memory();

    let (status, json) = send(
        &app,
        register_request(&payload("john@localhost", "password123")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_lookup_failure_is_generic_500() {
    let repo = Arc::new(UnavailableRepository::default());
    let app = setup_app(repo.clone(), Arc::new(BcryptHasher::with_cost(TEST_COST)));

    let (logs, _guard) = capture_logs();
    let (status, json) = send(
        &app,
        register_request(&payload("john.doe@example.com", "password123")),
    )
    .await;

    assert_generic_500(status, &json);
    assert_eq!(repo.inserts.load(Ordering::SeqCst), 0);

    // Full detail stays server-side
    let lookups = logs.with_message("Failed to look up user by email");
    assert_eq!(lookups.len(), 1);
    assert!(lookups[0].fields["error"].contains("connection refused"));
    assert_eq!(logs.with_message("Internal server error").len(), 1);
}

#[tokio::test]
async fn test_hashing_failure_is_generic_500() {
    let repo = InMemoryUserRepository::new();
    // bcrypt rejects costs below 4
    let app = setup_app(Arc::new(repo.clone()), Arc::new(BcryptHasher::with_cost(3)));

    let (status, json) = send(
        &app,
        register_request(&payload("john.doe@example.com", "password123")),
    )
    .await;

    assert_generic_500(status, &json);
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_unhandled_error_is_generic_500_and_logged() {
    let repo = InMemoryUserRepository::new();
    let state = AppState::new(UserService::new(
        Arc::new(repo),
        Arc::new(BcryptHasher::with_cost(TEST_COST)),
    ));
    let app = api::layers(api::routes().route(
        "/explode",
        get({
            async fn explode() {
                panic!("handler exploded");
            }
            explode
        }),
    ))
    .with_state(state);

    let (logs, _guard) = capture_logs();
    let (status, json) = send(
        &app,
        Request::builder().uri("/explode").body(Body::empty()).unwrap(),
    )
    .await;

    assert_generic_500(status, &json);
    let unhandled = logs.with_message("Unhandled error category");
    assert_eq!(unhandled.len(), 1);
    assert!(unhandled[0].fields["error"].contains("handler exploded"));
}
