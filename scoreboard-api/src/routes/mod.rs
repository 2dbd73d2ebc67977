//! REST API routes.
//!
//! Route registration and router assembly. The `.json`/`.xml` collection
//! variants are registered as explicit paths; for item routes the format
//! suffix travels inside the `:id` segment and is handled by the `ResultId`
//! extractor.

pub mod health;
pub mod login;
pub mod results;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::extract::principal_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let auth = state.auth.clone();

    let collection = get(results::list_results).post(results::create_result);

    let api = Router::new()
        .route(
            "/api/v1/results",
            collection.clone().options(results::options_collection),
        )
        .route("/api/v1/results.json", collection.clone())
        .route("/api/v1/results.xml", collection)
        .route(
            "/api/v1/results/:id",
            get(results::get_result)
                .put(results::update_result)
                .delete(results::delete_result)
                .options(results::options_item),
        )
        .route("/api/v1/login", post(login::login))
        .with_state(state)
        .layer(from_fn_with_state(auth, principal_middleware));

    let cors = if config.cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
}
