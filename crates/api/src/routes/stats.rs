//! Stats concern: DNS top/type, protocol distribution, services, top
//! talkers, connection trends — all derived from Zeek logs via C3's
//! bounded tails, each TTL-cached 30 s (spec §4.9).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::{Extension, Json};
use serde_json::{json, Value};
use tap_core::Source;
use tap_tail::{EveJsonParser, TailReadResult};

use crate::error::{cached_envelope, ApiError};
use crate::request_id::RequestId;
use crate::state::ApiState;

const STATS_TTL: Duration = Duration::from_secs(30);
const TAIL_WINDOW_BYTES: usize = 2 * 1024 * 1024;
const TOP_N: usize = 10;

#[derive(Default)]
pub struct StatsCache {
    entries: tokio::sync::Mutex<HashMap<&'static str, (Instant, Value)>>,
}

impl StatsCache {
    /// Single-flight: the lock stays held across recomputation so
    /// concurrent callers for the same stat await rather than race.
    async fn get_or_compute<F, Fut>(&self, key: &'static str, compute: F) -> Result<(Value, bool), ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Value, ApiError>>,
    {
        let mut guard = self.entries.lock().await;
        if let Some((computed_at, value)) = guard.get(key) {
            if computed_at.elapsed() < STATS_TTL {
                return Ok((value.clone(), true));
            }
        }
        let value = compute().await?;
        guard.insert(key, (Instant::now(), value.clone()));
        Ok((value, false))
    }
}

/// Bounded tail of `{zeek_log_dir}/{log_type}.log`, parsed as JSON-format
/// Zeek log lines (spec §4.3, same parser the live followers use).
pub async fn tail_zeek_log(state: &ApiState, log_type: &str, request_id: uuid::Uuid) -> Result<TailReadResult, ApiError> {
    let path = state.config.get().paths.zeek_log_dir.join(format!("{log_type}.log"));
    let parser = EveJsonParser::new(Source::Zeek);
    state
        .tail_cache
        .tail(&path, TAIL_WINDOW_BYTES, &parser)
        .await
        .map_err(|e| ApiError::from_err(e, request_id))
}

fn raw_str<'a>(event: &'a tap_core::AlertEvent, field: &str) -> Option<&'a str> {
    event.raw.get(field).and_then(Value::as_str)
}

fn raw_num(event: &tap_core::AlertEvent, field: &str) -> f64 {
    event.raw.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

pub async fn dns_top(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<Value>, ApiError> {
    let (value, cached) = state
        .stats_cache
        .get_or_compute("dns_top", || async {
            let tail = tail_zeek_log(&state, "dns", request_id).await?;
            let mut counts: HashMap<String, u64> = HashMap::new();
            for event in tail.events.iter() {
                if let Some(query) = raw_str(event, "query") {
                    *counts.entry(query.to_string()).or_insert(0) += 1;
                }
            }
            Ok(top_n(counts))
        })
        .await?;
    Ok(cached_envelope(value, cached, STATS_TTL.as_millis() as u64))
}

pub async fn dns_type(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<Value>, ApiError> {
    let (value, cached) = state
        .stats_cache
        .get_or_compute("dns_type", || async {
            let tail = tail_zeek_log(&state, "dns", request_id).await?;
            let mut counts: HashMap<String, u64> = HashMap::new();
            for event in tail.events.iter() {
                let qtype = raw_str(event, "qtype_name").unwrap_or("unknown");
                *counts.entry(qtype.to_string()).or_insert(0) += 1;
            }
            Ok(top_n(counts))
        })
        .await?;
    Ok(cached_envelope(value, cached, STATS_TTL.as_millis() as u64))
}

pub async fn protocol_distribution(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<Value>, ApiError> {
    let (value, cached) = state
        .stats_cache
        .get_or_compute("protocol_distribution", || async {
            let tail = tail_zeek_log(&state, "conn", request_id).await?;
            let mut counts: HashMap<String, u64> = HashMap::new();
            for event in tail.events.iter() {
                let proto = event.proto.clone().unwrap_or_else(|| "unknown".to_string());
                *counts.entry(proto).or_insert(0) += 1;
            }
            Ok(top_n(counts))
        })
        .await?;
    Ok(cached_envelope(value, cached, STATS_TTL.as_millis() as u64))
}

pub async fn services(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<Value>, ApiError> {
    let (value, cached) = state
        .stats_cache
        .get_or_compute("services", || async {
            let tail = tail_zeek_log(&state, "conn", request_id).await?;
            let mut counts: HashMap<String, u64> = HashMap::new();
            for event in tail.events.iter() {
                let service = raw_str(event, "service").unwrap_or("unknown");
                *counts.entry(service.to_string()).or_insert(0) += 1;
            }
            Ok(top_n(counts))
        })
        .await?;
    Ok(cached_envelope(value, cached, STATS_TTL.as_millis() as u64))
}

pub async fn top_talkers(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<Value>, ApiError> {
    let (value, cached) = state
        .stats_cache
        .get_or_compute("top_talkers", || async {
            let tail = tail_zeek_log(&state, "conn", request_id).await?;
            let mut bytes_by_host: HashMap<String, u64> = HashMap::new();
            for event in tail.events.iter() {
                let Some(host) = event.src_ip.clone() else { continue };
                let total = raw_num(event, "orig_bytes") + raw_num(event, "resp_bytes");
                *bytes_by_host.entry(host).or_insert(0) += total as u64;
            }
            Ok(top_n(bytes_by_host))
        })
        .await?;
    Ok(cached_envelope(value, cached, STATS_TTL.as_millis() as u64))
}

pub async fn connection_trends(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<Value>, ApiError> {
    let (value, cached) = state
        .stats_cache
        .get_or_compute("connection_trends", || async {
            let tail = tail_zeek_log(&state, "conn", request_id).await?;
            let mut per_minute: HashMap<String, u64> = HashMap::new();
            for event in tail.events.iter() {
                let bucket = event.timestamp.format("%Y-%m-%dT%H:%M").to_string();
                *per_minute.entry(bucket).or_insert(0) += 1;
            }
            let mut buckets: Vec<(String, u64)> = per_minute.into_iter().collect();
            buckets.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(json!(buckets
                .into_iter()
                .map(|(minute, count)| json!({ "minute": minute, "count": count }))
                .collect::<Vec<_>>()))
        })
        .await?;
    Ok(cached_envelope(value, cached, STATS_TTL.as_millis() as u64))
}

fn top_n(counts: HashMap<String, u64>) -> Value {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(TOP_N);
    json!(entries.into_iter().map(|(key, count)| json!({ "key": key, "count": count })).collect::<Vec<_>>())
}
