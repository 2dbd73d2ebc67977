//! Scoreboard API - REST layer
//!
//! Exposes the result resource (a user-owned numeric score) under CRUD
//! semantics with owner-or-admin authorization and ETag conditional-GET
//! caching, in JSON or XML.

pub mod auth;
pub mod config;
pub mod error;
pub mod etag;
pub mod extract;
pub mod policy;
pub mod render;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use auth::{generate_token, password_digest, verify_token, AuthConfig, Clock, FixedClock, SystemClock};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use extract::{IfNoneMatch, LenientJson, MaybePrincipal, ResultId};
pub use policy::AccessPolicy;
pub use render::Format;
pub use routes::create_api_router;
pub use service::{ListOutcome, ReadOutcome, ResultService};
pub use state::AppState;
pub use store::{MemoryStore, ResultStore, StoreError};
pub use types::*;
