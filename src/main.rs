use std::sync::Arc;

use saver_api::api::{self, AppState};
use saver_api::config::Config;
use saver_api::infrastructure::database;
use saver_api::infrastructure::repositories::PostgresUserRepository;
use saver_api::security::BcryptHasher;
use saver_api::services::UserService;
use saver_api::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize tracing
    telemetry::init(&config.log);

    // Connect to database
    let pool = database::connect(&config.database).await?;

    // Wire the registration pipeline
    let repository = PostgresUserRepository::new(pool, config.database.query_timeout);
    let hasher = BcryptHasher::with_cost(config.bcrypt_cost);
    let users = UserService::new(Arc::new(repository), Arc::new(hasher));

    // Build router
    let app = api::router(AppState::new(users));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.server.bind_target()).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
