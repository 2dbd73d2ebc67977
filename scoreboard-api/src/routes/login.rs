//! Credential exchange: password in, bearer token out.

use axum::{extract::State, response::Response};

use crate::auth::{generate_token, password_digest};
use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::render::{self, Format};
use crate::state::AppState;
use crate::types::{LoginRequest, TokenResponse};

/// POST /api/v1/login - verify credentials and issue a JWT.
///
/// Wrong email and wrong password answer identically; the response is not an
/// account-existence oracle.
pub async fn login(
    State(state): State<AppState>,
    format: Format,
    LenientJson(req): LenientJson<LoginRequest>,
) -> Response {
    let (Some(email), Some(password)) = (req.email.as_deref(), req.password.as_deref()) else {
        return render::error(
            format,
            ApiError::validation_failed("Fields 'email' and 'password' are required"),
        );
    };

    let user = match state.store.user_by_email(email).await {
        Ok(user) => user,
        Err(err) => return render::error(format, err.into()),
    };

    let verified = user.filter(|u| u.password_digest == password_digest(password));
    let Some(user) = verified else {
        return render::error(format, ApiError::unauthorized());
    };

    match generate_token(&state.auth, &user.email, &user.roles) {
        Ok(token) => {
            tracing::info!(email = %user.email, "login succeeded");
            render::created(format, &TokenResponse { token })
        }
        Err(err) => render::error(format, err),
    }
}
