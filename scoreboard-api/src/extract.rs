//! Request extractors and the principal-resolution middleware.
//!
//! Authentication never rejects at the transport edge: the middleware parses
//! the bearer token and, when it verifies, injects a `Principal` into request
//! extensions. Handlers receive `Option<Principal>` and thread it into the
//! service, which owns the 401 decision. There is no ambient current-user
//! state anywhere.

use crate::auth::{verify_token, AuthConfig};
use crate::error::ApiError;
use crate::etag::parse_client_tags;
use crate::render::{self, Format};
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use scoreboard_core::Principal;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;

/// Upper bound on request body size accepted by `LenientJson`.
const BODY_LIMIT: usize = 1024 * 1024;

// ============================================================================
// PRINCIPAL MIDDLEWARE
// ============================================================================

/// Resolve the request's principal from the `Authorization: Bearer` header.
///
/// A missing, malformed, or invalid token leaves the request unauthenticated
/// rather than short-circuiting; every operation answers its own 401 through
/// the access policy, so unauthenticated requests get a uniform response
/// regardless of resource existence.
pub async fn principal_middleware(
    State(auth): State<Arc<AuthConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        match verify_token(&auth, token) {
            Ok(principal) => {
                request.extensions_mut().insert(principal);
            }
            Err(_) => {
                tracing::debug!("Bearer token did not verify; request proceeds unauthenticated");
            }
        }
    }

    next.run(request).await
}

// ============================================================================
// EXTRACTORS
// ============================================================================

/// The request's principal, when one was resolved.
///
/// Never rejects; the absence of a principal is a service-level outcome.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

/// A request body deserialized leniently.
///
/// Missing, oversized, unparseable, or mislabeled bodies yield the type's
/// default (all-`None` fields) instead of rejecting, so the service keeps
/// sole ownership of the 401/422 ordering. A transport-level body rejection
/// here would answer 400/415 before the authentication gate ever ran.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let parsed = match axum::body::to_bytes(req.into_body(), BODY_LIMIT).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => T::default(),
        };
        Ok(LenientJson(parsed))
    }
}

/// A result id from the path, tolerating a trailing format suffix
/// (`/results/7`, `/results/7.json`, `/results/7.xml`).
///
/// Ids are positive integers; anything else resolves to 404, matching the
/// route constraint of the wire contract.
#[derive(Debug, Clone, Copy)]
pub struct ResultId(pub i64);

/// Rejection carrying the 404 body in the request's negotiated format.
#[derive(Debug)]
pub struct ResultIdRejection(Format);

impl IntoResponse for ResultIdRejection {
    fn into_response(self) -> Response {
        render::error(self.0, ApiError::not_found())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResultId
where
    S: Send + Sync,
{
    type Rejection = ResultIdRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let format = Format::negotiate(parts);
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ResultIdRejection(format))?;

        let digits = raw
            .strip_suffix(".json")
            .or_else(|| raw.strip_suffix(".xml"))
            .unwrap_or(&raw);

        match digits.parse::<i64>() {
            Ok(id) if id > 0 => Ok(ResultId(id)),
            _ => Err(ResultIdRejection(format)),
        }
    }
}

/// The client's `If-None-Match` tag set. Empty when the header is absent.
#[derive(Debug, Clone, Default)]
pub struct IfNoneMatch(pub Vec<String>);

#[async_trait]
impl<S> FromRequestParts<S> for IfNoneMatch
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tags = parts
            .headers
            .get(header::IF_NONE_MATCH)
            .and_then(|h| h.to_str().ok())
            .map(parse_client_tags)
            .unwrap_or_default();
        Ok(IfNoneMatch(tags))
    }
}
