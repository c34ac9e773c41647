//! `/ws/alerts`: live alert fan-out (spec §4.9, §4.4). The handshake runs
//! its own Basic-auth check — outside [`crate::auth_middleware`] — because
//! a failed auth here rejects with WebSocket close code 4401, not a plain
//! 401 JSON body.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tap_auth::{AuthError, Principal};
use tap_core::Source;
use tap_eventbus::{BusNotice, EventFilter};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::debug;

use crate::routes::alerts::{parse_source, recent_alerts};
use crate::state::ApiState;

const PING_INTERVAL: Duration = Duration::from_secs(30);
const MAX_MISSED_PONGS: u32 = 2;
const OUTBOUND_CAPACITY: usize = 256;
const INITIAL_BATCH: usize = 20;

const CLOSE_UNAUTHORIZED: u16 = 4401;
const CLOSE_OVERFLOW: u16 = 1011;
const CLOSE_UNRESPONSIVE: u16 = 1011;
const CLOSE_SHUTDOWN: u16 = 1001;

#[derive(Debug, Deserialize)]
struct FilterUpdate {
    filter: ClientFilter,
}

#[derive(Debug, Deserialize, Default)]
struct ClientFilter {
    source: Option<String>,
    min_severity: Option<i32>,
}

impl ClientFilter {
    fn into_event_filter(self) -> EventFilter {
        let sources: Option<Vec<Source>> = self.source.as_deref().and_then(parse_source).map(|s| vec![s]);
        EventFilter { sources, severity_at_most: self.min_severity }
    }
}

pub async fn ws_alerts(ws: WebSocketUpgrade, State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::Unauthenticated)
        .and_then(|value| tap_auth::verify(value, &state.config.get().web.auth));

    ws.on_upgrade(move |socket| handle_socket(socket, state, auth))
}

async fn handle_socket(socket: WebSocket, state: Arc<ApiState>, auth: Result<Principal, AuthError>) {
    let Ok(_principal) = auth else {
        let (mut sink, _stream) = socket.split();
        let _ = sink
            .send(Message::Close(Some(CloseFrame { code: CLOSE_UNAUTHORIZED, reason: "unauthenticated".into() })))
            .await;
        return;
    };

    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_CAPACITY);

    let writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
    });

    let initial = recent_alerts(&state, None, INITIAL_BATCH);
    let batch = json!({ "type": "recent", "events": initial });
    if out_tx.send(Message::Text(batch.to_string())).await.is_err() {
        drop(out_tx);
        let _ = writer.await;
        return;
    }

    let mut subscription = state.bus.subscribe(EventFilter::all());
    let mut shutdown_rx = state.subscribe_shutdown();
    let mut ticker = interval(PING_INTERVAL);
    ticker.tick().await;
    let mut awaiting_pong = false;
    let mut missed_pongs = 0u32;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                let _ = out_tx.send(Message::Close(Some(CloseFrame {
                    code: CLOSE_SHUTDOWN,
                    reason: "server shutting down".into(),
                }))).await;
                break;
            }
            _ = ticker.tick() => {
                if awaiting_pong {
                    missed_pongs += 1;
                    if missed_pongs >= MAX_MISSED_PONGS {
                        let _ = out_tx.send(Message::Close(Some(CloseFrame {
                            code: CLOSE_UNRESPONSIVE,
                            reason: "no pong received".into(),
                        }))).await;
                        break;
                    }
                }
                if out_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
                awaiting_pong = true;
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Pong(_))) => {
                        awaiting_pong = false;
                        missed_pongs = 0;
                    }
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(update) = serde_json::from_str::<FilterUpdate>(&text) {
                            subscription = state.bus.subscribe(update.filter.into_event_filter());
                        } else {
                            debug!("ignoring unrecognized ws/alerts client message");
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
            notice = subscription.recv() => {
                let Some(notice) = notice else { break };
                let payload = match notice {
                    BusNotice::Alert(event) => json!({ "type": "alert", "event": event.as_ref() }),
                    BusNotice::Lagging { dropped_since_last } => {
                        json!({ "type": "lagging", "dropped_since_last": dropped_since_last })
                    }
                };
                if out_tx.try_send(Message::Text(payload.to_string())).is_err() {
                    let _ = out_tx.send(Message::Close(Some(CloseFrame {
                        code: CLOSE_OVERFLOW,
                        reason: "outbound buffer overflow".into(),
                    }))).await;
                    break;
                }
            }
        }
    }

    drop(out_tx);
    let _ = writer.await;
}
