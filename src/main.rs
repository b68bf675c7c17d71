//! CS Rippers backend service
//!
//! Main application entry point

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal::{self, unix::SignalKind};
use tracing::info;

use cs_rippers::api::{router, AppState};
use cs_rippers::config::Settings;
use cs_rippers::database::{connection, DatabaseService};
use cs_rippers::middleware::{RateLimitConfig, RateLimiter};
use cs_rippers::services::ServiceFactory;
use cs_rippers::utils::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting CS Rippers backend...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig::from_settings(&settings.database);
    let db_pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&db_pool).await?;

    // Initialize services
    info!("Initializing services...");
    let database_service = DatabaseService::new(db_pool);
    let services = ServiceFactory::new(database_service.clone(), settings.clone()).await?;

    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            tracing::warn!(issue = %issue, "Service degraded at startup");
        }
    }

    // In-process limiter for the credential endpoints
    let limiter = RateLimiter::new(RateLimitConfig {
        max_requests: settings.auth.rate_limit_max_requests as u32,
        window_duration: Duration::from_secs(settings.auth.rate_limit_window_seconds),
        ..Default::default()
    });

    let state = AppState::new(services, database_service, settings.clone());
    let app = router(state, limiter);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("CS Rippers backend running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("CS Rippers backend has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
