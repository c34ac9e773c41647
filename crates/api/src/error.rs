//! The one error shape every handler returns (spec §4.9 common response
//! shape). Every library crate's error enum implements [`tap_core::HasKind`];
//! handlers convert with [`ApiError::from_err`] and attach the request id
//! stamped by [`crate::request_id`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tap_core::error::{HasKind, Kind};
use tracing::{error, warn};
use uuid::Uuid;

pub struct ApiError {
    kind: Kind,
    message: String,
    details: Value,
    request_id: Uuid,
}

impl ApiError {
    pub fn new(kind: Kind, message: impl Into<String>, request_id: Uuid) -> Self {
        Self { kind, message: message.into(), details: json!({}), request_id }
    }

    pub fn from_err<E: HasKind + std::fmt::Display>(err: E, request_id: Uuid) -> Self {
        Self::new(err.kind(), err.to_string(), request_id)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut details = self.details;
        if !details.is_object() {
            details = json!({});
        }
        details["request_id"] = json!(self.request_id.to_string());

        if self.kind.is_client_error() {
            warn!(status = status.as_u16(), kind = ?self.kind, request_id = %self.request_id, "request rejected: {}", self.message);
        } else {
            error!(status = status.as_u16(), kind = ?self.kind, request_id = %self.request_id, "request failed: {}", self.message);
        }

        let body = json!({
            "error": {
                "kind": self.kind,
                "message": self.message,
                "details": details,
            }
        });
        (status, Json(body)).into_response()
    }
}

/// `{ "data": ..., "meta": { "cached": bool, "ttl_ms": int } }` (spec §4.9).
pub fn cached_envelope<T: serde::Serialize>(data: T, cached: bool, ttl_ms: u64) -> Json<Value> {
    Json(json!({ "data": data, "meta": { "cached": cached, "ttl_ms": ttl_ms } }))
}

/// Uncached reads still use the envelope shape, with `cached: false` and no
/// meaningful ttl.
pub fn envelope<T: serde::Serialize>(data: T) -> Json<Value> {
    cached_envelope(data, false, 0)
}
