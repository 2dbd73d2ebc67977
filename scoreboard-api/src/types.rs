//! Request and response DTOs for the REST surface.
//!
//! Required fields are modeled as `Option` so that "missing field" is a
//! service-level validation outcome (422) rather than a deserialization
//! failure; the original wire contract distinguishes the two.

use scoreboard_core::ScoreResult;
use serde::{Deserialize, Serialize};

/// POST /api/v1/results body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateResultRequest {
    /// The score value.
    pub result: Option<i64>,

    /// Identity of the owning user.
    pub email: Option<String>,
}

/// PUT /api/v1/results/{id} body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResultRequest {
    /// The new score value.
    pub result: Option<i64>,
}

/// GET /api/v1/results body: `{ "results": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "results")]
pub struct ResultsPage {
    pub results: Vec<ScoreResult>,
}

/// POST /api/v1/login body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "token")]
pub struct TokenResponse {
    pub token: String,
}
