//! WebSocket surface for patient subscriptions.
//!
//! Connection lifecycle:
//! 1. Client logs in over HTTP and opens `GET /ws?token=<session id>`
//! 2. The token is resolved against the session store before upgrading
//! 3. Client sends `subscribe` / `unsubscribe` frames; each gets one reply
//! 4. Subscriptions are dropped when the socket closes
//!
//! The server does not push anything beyond those replies.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Maximum incoming messages per second per connection.
const MAX_INCOMING_PER_SECOND: u32 = 10;

/// Query parameters for WebSocket upgrade.
#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum WsIncoming {
    Subscribe {
        #[serde(rename = "patientId")]
        patient_id: String,
    },
    Unsubscribe {
        #[serde(rename = "patientId")]
        patient_id: String,
    },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum WsOutgoing {
    Subscribed {
        #[serde(rename = "patientId")]
        patient_id: String,
    },
    Unsubscribed {
        #[serde(rename = "patientId")]
        patient_id: String,
    },
    Error {
        message: String,
    },
}

impl WsOutgoing {
    fn error(message: impl Into<String>) -> Self {
        WsOutgoing::Error {
            message: message.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Per-connection state
// ═══════════════════════════════════════════════════════════

/// Subscriptions and rate window for one socket.
#[derive(Default)]
pub(crate) struct WsSessionState {
    subscriptions: HashSet<String>,
    incoming_times: VecDeque<Instant>,
}

impl WsSessionState {
    /// Handle one text frame and produce the reply.
    pub(crate) fn handle_text(&mut self, text: &str) -> WsOutgoing {
        if !check_incoming_rate(&mut self.incoming_times) {
            return WsOutgoing::error("Too many messages");
        }
        match serde_json::from_str::<WsIncoming>(text) {
            Ok(incoming) => self.apply(incoming),
            Err(_) => WsOutgoing::error("Unrecognized message"),
        }
    }

    fn apply(&mut self, msg: WsIncoming) -> WsOutgoing {
        match msg {
            WsIncoming::Subscribe { patient_id } => {
                let patient_id = patient_id.trim().to_string();
                if patient_id.is_empty() {
                    return WsOutgoing::error("patientId is required");
                }
                self.subscriptions.insert(patient_id.clone());
                WsOutgoing::Subscribed { patient_id }
            }
            WsIncoming::Unsubscribe { patient_id } => {
                let patient_id = patient_id.trim().to_string();
                self.subscriptions.remove(&patient_id);
                WsOutgoing::Unsubscribed { patient_id }
            }
        }
    }

    #[cfg(test)]
    fn is_subscribed(&self, patient_id: &str) -> bool {
        self.subscriptions.contains(patient_id)
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

/// Check if an incoming message is within the rate limit (10/sec).
fn check_incoming_rate(timestamps: &mut VecDeque<Instant>) -> bool {
    let now = Instant::now();
    let one_sec_ago = now - Duration::from_secs(1);

    while let Some(&front) = timestamps.front() {
        if front < one_sec_ago {
            timestamps.pop_front();
        } else {
            break;
        }
    }

    if timestamps.len() as u32 >= MAX_INCOMING_PER_SECOND {
        return false;
    }

    timestamps.push_back(now);
    true
}

// ═══════════════════════════════════════════════════════════
// Upgrade + connection loop
// ═══════════════════════════════════════════════════════════

/// `GET /ws?token=`: upgrade only for a live session.
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(ctx): State<ApiContext>,
    Query(query): Query<WsAuthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?;
    let claims = ctx.sessions.get(&token)?.ok_or(ApiError::Unauthorized)?;

    tracing::info!(user_id = claims.user_id, "WebSocket upgrade accepted");
    Ok(ws.on_upgrade(move |socket| handle_ws(socket, claims.user_id)))
}

async fn handle_ws(socket: WebSocket, user_id: i64) {
    let (mut sink, mut stream) = socket.split();
    let mut state = WsSessionState::default();

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = state.handle_text(&text);
                if let WsOutgoing::Subscribed { patient_id } = &reply {
                    tracing::debug!(user_id, %patient_id, "Patient subscription added");
                }
                let json = match serde_json::to_string(&reply) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if sink.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {} // Ping/Pong handled by axum
        }
    }

    let _ = sink.close().await;
    tracing::info!(
        user_id,
        subscriptions = state.subscription_count(),
        "WebSocket disconnected"
    );
}
