//! Response rendering in the negotiated representation format.
//!
//! JSON is the default; XML is selected by a `.xml` path suffix or an
//! `Accept: application/xml` header (the suffix wins). Every body the API
//! emits - resources, collections, errors - goes through this module so the
//! two formats cannot diverge.

use crate::error::ApiError;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::convert::Infallible;

/// Non-standard "Content Returned" success status used by update responses.
const CONTENT_RETURNED: u16 = 209;

// ============================================================================
// FORMAT NEGOTIATION
// ============================================================================

/// The representation format negotiated for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    pub fn content_type(self) -> HeaderValue {
        match self {
            Format::Json => HeaderValue::from_static("application/json"),
            Format::Xml => HeaderValue::from_static("application/xml"),
        }
    }

    /// Negotiate from the request: path suffix first, then Accept header.
    pub(crate) fn negotiate(parts: &Parts) -> Format {
        let path = parts.uri.path();
        if path.ends_with(".xml") {
            return Format::Xml;
        }
        if path.ends_with(".json") {
            return Format::Json;
        }

        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");
        if accept.contains("application/xml") || accept.contains("text/xml") {
            return Format::Xml;
        }
        Format::Json
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Format::negotiate(parts))
    }
}

// ============================================================================
// BODY RENDERING
// ============================================================================

fn render_body<T: Serialize>(format: Format, value: &T) -> Result<String, ApiError> {
    match format {
        Format::Json => serde_json::to_string(value).map_err(ApiError::from),
        Format::Xml => quick_xml::se::to_string(value).map_err(|e| {
            tracing::error!("XML serialization error: {:?}", e);
            ApiError::internal_error("Failed to serialize response")
        }),
    }
}

fn with_body<T: Serialize>(status: StatusCode, format: Format, value: &T) -> Response {
    match render_body(format, value) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, format.content_type())],
            body,
        )
            .into_response(),
        // Serialization failure of the negotiated format: fall back to the
        // plain JSON error path.
        Err(err) => err.into_response(),
    }
}

// ============================================================================
// RESPONSE BUILDERS
// ============================================================================

/// 200 with `ETag` and `Cache-Control: private`, for successful reads.
pub fn ok_cached<T: Serialize>(format: Format, etag: &str, value: &T) -> Response {
    let mut response = with_body(StatusCode::OK, format, value);
    if let Ok(tag) = HeaderValue::from_str(etag) {
        response.headers_mut().insert(header::ETAG, tag);
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("private"),
        );
    }
    response
}

/// 201 Created with the stored representation.
pub fn created<T: Serialize>(format: Format, value: &T) -> Response {
    with_body(StatusCode::CREATED, format, value)
}

/// 209 Content Returned: the post-update representation, distinguishable
/// from a fresh creation.
pub fn updated<T: Serialize>(format: Format, value: &T) -> Response {
    let status = StatusCode::from_u16(CONTENT_RETURNED).unwrap_or(StatusCode::OK);
    with_body(status, format, value)
}

/// 204 No Content.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// 304 Not Modified, empty body. Reads only.
pub fn not_modified() -> Response {
    StatusCode::NOT_MODIFIED.into_response()
}

/// 204 capability-discovery response with the `Allow` header.
pub fn options(methods: &str) -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ALLOW, HeaderValue::from_str(methods).unwrap_or(HeaderValue::from_static("OPTIONS"))),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, immutable"),
            ),
        ],
    )
        .into_response()
}

/// An error body in the negotiated format.
pub fn error(format: Format, err: ApiError) -> Response {
    with_body(err.status_code(), format, &err)
}
