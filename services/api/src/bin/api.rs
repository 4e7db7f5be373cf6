//! services/api/src/bin/api.rs

use contact_api_lib::{
    adapters::{db::DbAdapter, mailer::SmtpMailer},
    config::Config,
    error::ApiError,
    web::{build_router, cors_layer, state::AppState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize the Mail Transport ---
    let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);
    info!("Mail transport profile: {:?}", mailer.profile());

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        db_adapter,
        mailer,
        config.admin_email.clone(),
    )?);

    // --- 5. Create the Web Router ---
    let cors = cors_layer(config.cors_allowed_origin.as_deref())?;
    let app = build_router(app_state, cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
