//! Alerts concern: bounded reads from C4's ring plus C3's Zeek log tails
//! (spec §4.9).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use tap_core::{AlertEvent, Source};

use crate::error::{envelope, ApiError};
use crate::request_id::RequestId;
use crate::routes::stats::tail_zeek_log;
use crate::state::ApiState;

const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    pub source: Option<String>,
    pub limit: Option<usize>,
    pub since: Option<chrono::DateTime<chrono::Utc>>,
}

pub(crate) fn parse_source(raw: &str) -> Option<Source> {
    match raw {
        "suricata" => Some(Source::Suricata),
        "zeek" => Some(Source::Zeek),
        "anomaly" => Some(Source::Anomaly),
        _ => None,
    }
}

/// Merge `bus.recent()` across every source when `source` is unset
/// (`recent()` is itself per-source), oldest-to-newest.
pub fn recent_alerts(state: &ApiState, source: Option<Source>, limit: usize) -> Vec<Arc<AlertEvent>> {
    let sources: Vec<Source> = match source {
        Some(s) => vec![s],
        None => vec![Source::Suricata, Source::Zeek, Source::Anomaly],
    };
    let mut merged: Vec<Arc<AlertEvent>> = sources.into_iter().flat_map(|s| state.bus.recent(s, limit)).collect();
    merged.sort_by_key(|e| e.timestamp);
    if merged.len() > limit {
        let drop = merged.len() - limit;
        merged.drain(0..drop);
    }
    merged
}

pub async fn list_alerts(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let source = match query.source.as_deref() {
        Some(raw) => Some(
            parse_source(raw)
                .ok_or_else(|| ApiError::new(tap_core::error::Kind::ValidationError, format!("unknown source {raw:?}"), request_id))?,
        ),
        None => None,
    };

    let mut events = recent_alerts(&state, source, limit);
    if let Some(since) = query.since {
        events.retain(|e| e.timestamp > since);
    }
    Ok(envelope(events))
}

pub async fn recent_alias(
    state: State<Arc<ApiState>>,
    request_id: Extension<RequestId>,
    query: Query<AlertsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    list_alerts(state, request_id, query).await
}

#[derive(Debug, Deserialize)]
pub struct ZeekLogQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub filter: Option<String>,
}

/// `GET /zeek/logs/{type}`: a bounded tail of `{zeek_log_dir}/{type}.log`,
/// parsed the same way C3's Zeek followers parse live lines.
pub async fn zeek_log(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path(log_type): Path<String>,
    Query(query): Query<ZeekLogQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let page = query.page.unwrap_or(0);
    let result = tail_zeek_log(&state, &log_type, request_id).await?;

    let mut records: Vec<&AlertEvent> = result.events.iter().collect();
    if let Some(needle) = &query.filter {
        records.retain(|e| e.signature.contains(needle.as_str()) || e.raw.values().any(|v| v.to_string().contains(needle.as_str())));
    }
    let page_items: Vec<&AlertEvent> = records.into_iter().skip(page * limit).take(limit).collect();

    Ok(envelope(page_items))
}
