//! Per-request id, stamped before any other layer runs (spec §4.9: "a
//! `tower-http::request_id`-style middleware stamps a `uuid` per request").

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId(pub Uuid);

pub const HEADER_NAME: &str = "x-request-id";

pub async fn stamp_request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId(Uuid::new_v4());
    req.extensions_mut().insert(id);

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id.0.to_string()) {
        response.headers_mut().insert(HEADER_NAME, value);
    }
    response
}
