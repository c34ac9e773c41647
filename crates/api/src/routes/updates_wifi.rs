//! Updates / WiFi concern: thin forwarding wrappers over host scripts, no
//! in-core logic (spec §4.9, Non-goals — internals stay out of scope, only
//! the forwarding surface is implemented).

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use tap_auth::{require_role, Principal};
use tap_core::config::Role;
use tap_hostctl::{timeouts, ScriptCommand};

use crate::error::{envelope, ApiError};
use crate::request_id::RequestId;
use crate::state::ApiState;

async fn run_forwarded(
    state: &ApiState,
    program: &str,
    args: &[&str],
    request_id: uuid::Uuid,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cmd = ScriptCommand::new(program, timeouts::SCRIPT_TIMEOUT).args(args.iter().copied());
    let output = state.host.run_script(cmd, program).await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(serde_json::json!({
        "success": output.success(),
        "stdout": output.stdout,
        "stderr": output.stderr,
    })))
}

pub async fn updates_start(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;
    run_forwarded(&state, "networktap-update", &["start"], request_id).await
}

pub async fn updates_stop(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;
    run_forwarded(&state, "networktap-update", &["stop"], request_id).await
}

pub async fn updates_status(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    run_forwarded(&state, "networktap-update", &["status"], request_id).await
}

pub async fn wifi_start(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;
    let cmd = ScriptCommand::new("networktap-wifi", timeouts::WIFI_SURVEY_TIMEOUT).arg("start");
    let output = state.host.run_script(cmd, "networktap-wifi").await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(serde_json::json!({ "success": output.success(), "stdout": output.stdout, "stderr": output.stderr })))
}

pub async fn wifi_stop(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;
    run_forwarded(&state, "networktap-wifi", &["stop"], request_id).await
}

pub async fn wifi_status(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    run_forwarded(&state, "networktap-wifi", &["status"], request_id).await
}
