//! Scoreboard API server entry point.
//!
//! Bootstraps configuration, seeds the in-memory store, and starts the Axum
//! HTTP server.

use std::sync::Arc;

use scoreboard_api::{
    create_api_router, password_digest, ApiConfig, ApiError, ApiResult, AppState, AuthConfig,
    MemoryStore,
};
use scoreboard_core::{RoleTag, User};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let auth_config = AuthConfig::from_env();
    auth_config.validate_for_production()?;

    let api_config = ApiConfig::from_env();

    let store = Arc::new(MemoryStore::new());
    seed_admin(&store);

    let state = AppState::new(store, Arc::new(auth_config));
    let app = create_api_router(state, &api_config);

    let addr = api_config.bind_addr();
    tracing::info!(%addr, "Starting scoreboard API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Seed the bootstrap administrator from `SCOREBOARD_ADMIN_EMAIL` /
/// `SCOREBOARD_ADMIN_PASSWORD`. Without one, nothing can authenticate
/// against a fresh store.
fn seed_admin(store: &MemoryStore) {
    let email = std::env::var("SCOREBOARD_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@example.com".to_string());
    let password =
        std::env::var("SCOREBOARD_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    let admin = store.add_user(User::new(
        0,
        email,
        [RoleTag::Admin, RoleTag::User].into_iter().collect(),
        password_digest(&password),
    ));
    tracing::info!(email = %admin.email, "Seeded administrator");
}
