//! C8 gate applied to every route except `/health` and the WebSocket
//! handshake (spec §4.9 — the WebSocket rejects with close code 4401
//! instead, handled entirely inside [`crate::routes::ws`]).

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tap_auth::AuthError;

use crate::error::ApiError;
use crate::request_id::RequestId;
use crate::state::ApiState;

const EXEMPT_PATHS: &[&str] = &["/health", "/ws/alerts"];

pub async fn require_auth(State(state): State<Arc<ApiState>>, mut req: Request, next: Next) -> Response {
    if EXEMPT_PATHS.contains(&req.uri().path()) {
        return next.run(req).await;
    }

    let request_id = req.extensions().get::<RequestId>().copied().unwrap_or_default().0;
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let accounts = state.config.get().web.auth.clone();
    let verified = match header_value {
        Some(value) => tap_auth::verify(&value, &accounts),
        None => Err(AuthError::Unauthenticated),
    };

    match verified {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => ApiError::from_err(e, request_id).into_response(),
    }
}
