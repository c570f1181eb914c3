// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

use handlers::{health, users};

/// Route table without middleware or state
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ping", get(health::health_check))
        // User routes
        .route("/users", post(users::create_user))
}

/// Applies the middleware stack shared by every route
pub fn layers(router: Router<AppState>) -> Router<AppState> {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(CatchPanicLayer::custom(errors::unhandled_error)),
    )
}

/// Fully assembled application router
pub fn router(state: AppState) -> Router {
    layers(routes()).with_state(state)
}
