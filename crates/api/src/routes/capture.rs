//! Capture concern: status, start/stop, pcap listing and download with
//! `Range:` support (spec §4.9, §4.5).

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use tap_auth::{require_role, Principal};
use tap_capture::CaptureError;
use tap_core::config::Role;
use tap_core::error::Kind;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use crate::error::{envelope, ApiError};
use crate::request_id::RequestId;
use crate::state::ApiState;

pub async fn status(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = state.capture.status().await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(status))
}

pub async fn start(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;
    let status = state.capture.start().await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(status))
}

pub async fn stop(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;
    let status = state.capture.stop().await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(status))
}

#[derive(Debug, Deserialize)]
pub struct PcapsQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub filter: Option<String>,
}

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

pub async fn list_pcaps(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Query(query): Query<PcapsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let artifacts = state
        .capture
        .list(offset, limit, query.filter.as_deref())
        .await
        .map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(artifacts))
}

pub async fn download_pcap(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(tap_capture::parse_range_header)
        .transpose()
        .map_err(|e| ApiError::from_err(e, request_id))?;
    let is_partial = range.is_some();

    let opened = match state.capture.open(&name, range).await {
        Ok(opened) => opened,
        Err(CaptureError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::new(Kind::NotFound, format!("pcap not found: {name}"), request_id));
        }
        Err(e) => return Err(ApiError::from_err(e, request_id)),
    };

    let stream = ReaderStream::new(opened.file.take(opened.len));
    let body = Body::from_stream(stream);

    let status = if is_partial { StatusCode::PARTIAL_CONTENT } else { StatusCode::OK };
    let mut response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/vnd.tcpdump.pcap")
        .header(header::CONTENT_LENGTH, opened.len.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());

    if is_partial {
        let end = opened.start + opened.len.saturating_sub(1);
        if let Ok(value) =
            header::HeaderValue::from_str(&format!("bytes {}-{}/{}", opened.start, end, opened.total_size))
        {
            response.headers_mut().insert(header::CONTENT_RANGE, value);
        }
    }

    Ok(response)
}
