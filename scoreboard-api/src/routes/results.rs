//! Result REST routes.
//!
//! Thin adapters: negotiate the format, collect the principal and conditional
//! tags, call the service, render the typed outcome. All authorization and
//! cache-validation decisions happen in the service layer.

use axum::{extract::State, response::Response};

use crate::extract::{IfNoneMatch, LenientJson, MaybePrincipal, ResultId};
use crate::render::{self, Format};
use crate::service::{ListOutcome, ReadOutcome};
use crate::state::AppState;
use crate::types::{CreateResultRequest, ResultsPage, UpdateResultRequest};

const ALLOW_COLLECTION: &str = "GET, POST, OPTIONS";
const ALLOW_ITEM: &str = "GET, PUT, DELETE, OPTIONS";

/// POST /api/v1/results - create a result.
pub async fn create_result(
    State(state): State<AppState>,
    format: Format,
    MaybePrincipal(principal): MaybePrincipal,
    LenientJson(req): LenientJson<CreateResultRequest>,
) -> Response {
    match state.service.create(principal.as_ref(), &req).await {
        Ok(resource) => render::created(format, &resource),
        Err(err) => render::error(format, err),
    }
}

/// GET /api/v1/results - list the results visible to the principal.
pub async fn list_results(
    State(state): State<AppState>,
    format: Format,
    MaybePrincipal(principal): MaybePrincipal,
    IfNoneMatch(tags): IfNoneMatch,
) -> Response {
    match state.service.list(principal.as_ref(), &tags).await {
        Ok(ListOutcome::Fresh { results, etag }) => {
            render::ok_cached(format, &etag, &ResultsPage { results })
        }
        Ok(ListOutcome::NotModified) => render::not_modified(),
        // Preserved behavior: an empty listing answers 404.
        Ok(ListOutcome::Empty) => render::error(format, crate::error::ApiError::not_found()),
        Err(err) => render::error(format, err),
    }
}

/// GET /api/v1/results/{id} - fetch one result.
pub async fn get_result(
    State(state): State<AppState>,
    format: Format,
    MaybePrincipal(principal): MaybePrincipal,
    IfNoneMatch(tags): IfNoneMatch,
    ResultId(result_id): ResultId,
) -> Response {
    match state.service.get(principal.as_ref(), result_id, &tags).await {
        Ok(ReadOutcome::Fresh { resource, etag }) => render::ok_cached(format, &etag, &resource),
        Ok(ReadOutcome::NotModified) => render::not_modified(),
        Err(err) => render::error(format, err),
    }
}

/// PUT /api/v1/results/{id} - replace a result's value.
pub async fn update_result(
    State(state): State<AppState>,
    format: Format,
    MaybePrincipal(principal): MaybePrincipal,
    ResultId(result_id): ResultId,
    LenientJson(req): LenientJson<UpdateResultRequest>,
) -> Response {
    match state
        .service
        .update(principal.as_ref(), result_id, &req)
        .await
    {
        Ok(resource) => render::updated(format, &resource),
        Err(err) => render::error(format, err),
    }
}

/// DELETE /api/v1/results/{id} - remove a result.
pub async fn delete_result(
    State(state): State<AppState>,
    format: Format,
    MaybePrincipal(principal): MaybePrincipal,
    ResultId(result_id): ResultId,
) -> Response {
    match state.service.delete(principal.as_ref(), result_id).await {
        Ok(()) => render::no_content(),
        Err(err) => render::error(format, err),
    }
}

/// OPTIONS /api/v1/results - capability discovery for the collection.
pub async fn options_collection() -> Response {
    render::options(ALLOW_COLLECTION)
}

/// OPTIONS /api/v1/results/{id} - capability discovery for one item.
pub async fn options_item() -> Response {
    render::options(ALLOW_ITEM)
}
