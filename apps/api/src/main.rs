//! Aula API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use aula_application::CreateUserInput;
use aula_core::AppError;
use tracing::{info, warn};

use crate::api_config::ApiConfig;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let pool = api_services::connect(config.database_url.as_str()).await?;
    api_services::run_migrations(&pool).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_layer =
        api_services::build_postgres_session_layer(pool.clone(), config.cookie_secure).await?;
    let app_state = api_services::build_app_state(pool, &config);

    if config.seed_default_permissions {
        match app_state
            .security_admin_service
            .seed_default_permissions()
            .await
        {
            Ok(created) => info!(created, "default permissions ensured"),
            Err(error) => warn!(%error, "failed to seed default permissions"),
        }
    }

    if let Some(admin_email) = config.admin_email.clone() {
        let input = CreateUserInput {
            name: config.admin_name.clone(),
            email: admin_email,
        };
        match app_state.security_admin_service.seed_administrator(input).await {
            Ok(admin) => info!(user_id = %admin.user_id, "administrator ensured"),
            Err(error) => warn!(%error, "failed to seed administrator"),
        }
    }

    let app = api_router::build_router(app_state, session_layer)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "aula-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
