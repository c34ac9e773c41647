//! Config concern: snapshot read/patch and mode transitions (spec §4.9,
//! driving C1 and C7).

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use tap_auth::{require_role, Principal};
use tap_core::config::{Mode, Role};
use tap_core::error::Kind;

use crate::error::{envelope, ApiError};
use crate::request_id::RequestId;
use crate::state::ApiState;

pub async fn get_config(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    envelope(state.config.get().as_ref().clone())
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigPatch {
    pub mgmt_gateway: Option<String>,
    pub mgmt_dns: Option<String>,
    pub capture_rotate_seconds: Option<u32>,
    pub capture_file_limit: Option<u32>,
    pub capture_snaplen: Option<u32>,
    pub capture_compress: Option<bool>,
    pub capture_filter: Option<String>,
    pub retention_max_age_days: Option<u32>,
    pub retention_min_free_disk_pct: Option<u8>,
    pub suricata_enabled: Option<bool>,
    pub zeek_enabled: Option<bool>,
    pub ai_assistant_enabled: Option<bool>,
}

pub async fn patch_config(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(patch): Json<ConfigPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;

    let updated = state
        .config
        .set(|c| {
            if let Some(v) = patch.mgmt_gateway.clone() {
                c.mgmt_gateway = Some(v);
            }
            if let Some(v) = patch.mgmt_dns.clone() {
                c.mgmt_dns = Some(v);
            }
            if let Some(v) = patch.capture_rotate_seconds {
                c.capture.rotate_seconds = v;
            }
            if let Some(v) = patch.capture_file_limit {
                c.capture.file_limit = v;
            }
            if let Some(v) = patch.capture_snaplen {
                c.capture.snaplen = v;
            }
            if let Some(v) = patch.capture_compress {
                c.capture.compress = v;
            }
            if let Some(v) = patch.capture_filter.clone() {
                c.capture.filter = Some(v);
            }
            if let Some(v) = patch.retention_max_age_days {
                c.retention.max_age_days = v;
            }
            if let Some(v) = patch.retention_min_free_disk_pct {
                c.retention.min_free_disk_pct = v;
            }
            if let Some(v) = patch.suricata_enabled {
                c.features.suricata_enabled = v;
            }
            if let Some(v) = patch.zeek_enabled {
                c.features.zeek_enabled = v;
            }
            if let Some(v) = patch.ai_assistant_enabled {
                c.features.ai_assistant_enabled = v;
            }
        })
        .map_err(|e| ApiError::from_err(e, request_id))?;

    Ok(envelope(updated.as_ref().clone()))
}

pub async fn get_mode(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    envelope(serde_json::json!({ "mode": state.config.get().mode.as_str() }))
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

pub async fn post_mode(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(body): Json<ModeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;

    let target = Mode::from_str(&body.mode)
        .map_err(|msg| ApiError::new(Kind::ValidationError, msg, request_id))?;
    let outcome = state.mode.switch(target).await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(serde_json::json!({
        "from": outcome.from.as_str(),
        "to": outcome.to.as_str(),
        "stages_completed": outcome.stages_completed,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ClearDegradedRequest {
    pub resume_mode: String,
}

/// Admin-only recovery from the mode controller's terminal `Degraded`
/// state (spec Open Question, resolved in `modectl`: the daemon never
/// auto-clears it).
pub async fn clear_degraded(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(body): Json<ClearDegradedRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;

    let resume_mode = Mode::from_str(&body.resume_mode)
        .map_err(|msg| ApiError::new(Kind::ValidationError, msg, request_id))?;
    state.mode.clear_degraded(resume_mode).await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(serde_json::json!({ "mode": resume_mode.as_str() })))
}
