//! Shared application state for Axum routers.

use crate::auth::AuthConfig;
use crate::service::ResultService;
use crate::store::ResultStore;
use std::sync::Arc;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator behind every result endpoint.
    pub service: ResultService,

    /// Store handle; routes other than login only touch it through the
    /// service.
    pub store: Arc<dyn ResultStore>,

    /// Token configuration, shared with the principal middleware.
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResultStore>, auth: Arc<AuthConfig>) -> Self {
        let service = ResultService::new(store.clone(), auth.clock.clone());
        Self {
            service,
            store,
            auth,
        }
    }
}
