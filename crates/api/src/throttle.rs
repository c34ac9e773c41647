//! A small fixed-window counter per principal, applied only to
//! `/system/reboot` and `POST /config/mode` (spec §4.9: "a small fixed-window
//! counter per principal, not a generic external rate-limit service").

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use tap_core::error::Kind;

use crate::error::ApiError;
use crate::request_id::RequestId;
use crate::state::ApiState;

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window, windows: Mutex::new(HashMap::new()) }
    }

    /// True if `key` is still within its quota for the current window.
    pub fn check(&self, key: &str) -> bool {
        let mut windows = self.windows.lock();
        let now = Instant::now();
        let entry = windows.entry(key.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }
        entry.1 += 1;
        entry.1 <= self.limit
    }
}

pub async fn throttle_sensitive_endpoints(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = req.extensions().get::<RequestId>().copied().unwrap_or_default().0;
    let path = req.uri().path();
    let limiter = if req.method() == Method::POST && path == "/system/reboot" {
        Some(&state.reboot_throttle)
    } else if req.method() == Method::POST && path == "/config/mode" {
        Some(&state.mode_throttle)
    } else {
        None
    };

    if let Some(limiter) = limiter {
        // Principal is set by the auth layer, which runs before this one.
        let key = req
            .extensions()
            .get::<tap_auth::Principal>()
            .map(|p| format!("{path}:{}", p.user))
            .unwrap_or_else(|| format!("{path}:anonymous"));
        if !limiter.check(&key) {
            return ApiError::new(Kind::Throttled, "too many requests, slow down", request_id).into_response();
        }
    }

    next.run(req).await
}
