//! The inbound webhook — axum routes for Slack's Events API.
//!
//! Routes:
//! - `GET  /`               — health check
//! - `POST /slack/events`   — Events API callbacks (JSON)
//! - `POST /slack/commands` — slash commands (form-urlencoded)
//!
//! Both POST routes read the raw body bytes, verify the Slack signature
//! against those exact bytes, and only then parse. Verified conversational
//! events are published to the bus and acknowledged immediately — the
//! provider call never delays the 200, so Slack's retry timer stays quiet.
//!
//! Status codes: 400 for missing headers or unparseable payloads, 401 for
//! stale or mismatched signatures, 200 for everything else (including
//! events the relay deliberately ignores).

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{debug, error, info, warn};

use relaybot_core::bus::queue::MessageBus;
use relaybot_core::bus::types::InboundEvent;
use relaybot_core::utils::truncate_string;

use crate::events::{Dispatch, EventDispatcher, EventEnvelope};
use crate::signature::{SignatureError, SignatureVerifier};

/// Slack's timestamp header.
const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Slack's signature header.
const SIGNATURE_HEADER: &str = "x-slack-signature";

// ─────────────────────────────────────────────
// Gateway state + router
// ─────────────────────────────────────────────

/// Shared state for the webhook handlers — built once at startup.
pub struct GatewayState {
    pub verifier: SignatureVerifier,
    pub dispatcher: EventDispatcher,
    pub bus: Arc<MessageBus>,
}

/// Build the webhook router.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/slack/events", post(handle_events))
        .route("/slack/commands", post(handle_commands))
        .with_state(state)
}

// ─────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────

/// Health check endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "message": "relaybot is running"}))
}

/// Events API endpoint — verify, classify, acknowledge.
async fn handle_events(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = verify_request(&state, &headers, &body) {
        return resp;
    }

    // Parse only after the signature checks out; unknown event types land
    // in the Unrecognized variants rather than failing the parse.
    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "unparseable event payload");
            return malformed("invalid JSON payload");
        }
    };

    match state.dispatcher.dispatch(envelope) {
        Dispatch::Handshake(challenge) => {
            info!("URL verification handshake");
            // The response body is exactly the challenge string
            (StatusCode::OK, challenge).into_response()
        }
        Dispatch::Ignored(reason) => {
            debug!(reason = ?reason, "event acknowledged without action");
            ok_ack()
        }
        Dispatch::Forward(event) => {
            debug!(
                channel_id = %event.channel_id,
                user_id = %event.user_id,
                text = %truncate_string(&event.text, 80),
                "forwarding event to relay"
            );
            publish(&state, event).await;
            ok_ack()
        }
    }
}

/// Slash commands endpoint — verified like events, form-urlencoded payload.
async fn handle_commands(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = verify_request(&state, &headers, &body) {
        return resp;
    }

    let params: HashMap<String, String> = url::form_urlencoded::parse(&body)
        .into_owned()
        .collect();

    let (Some(channel_id), Some(user_id)) = (params.get("channel_id"), params.get("user_id"))
    else {
        warn!("slash command missing channel_id or user_id");
        return malformed("missing channel_id or user_id");
    };

    let text = params.get("text").map(String::as_str).unwrap_or("").trim();
    if text.is_empty() {
        return (
            StatusCode::OK,
            Json(json!({
                "response_type": "ephemeral",
                "text": "Give me something to answer, e.g. `/ask why is the sky blue?`"
            })),
        )
            .into_response();
    }

    info!(
        command = %params.get("command").map(String::as_str).unwrap_or("?"),
        channel_id = %channel_id,
        "slash command received"
    );

    // Slash commands reply straight to the channel, no thread anchor
    let event = InboundEvent::new(channel_id.clone(), user_id.clone(), text, "");
    publish(&state, event).await;

    (
        StatusCode::OK,
        Json(json!({
            "response_type": "ephemeral",
            "text": "On it — the reply will follow in this channel."
        })),
    )
        .into_response()
}

// ─────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────

/// Verify the Slack signature on a raw request; map failures to responses.
fn verify_request(
    state: &GatewayState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), Response> {
    let timestamp = headers.get(TIMESTAMP_HEADER).and_then(|v| v.to_str().ok());
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    match state.verifier.verify(timestamp, signature, body) {
        Ok(()) => Ok(()),
        Err(e) if e.is_authentication_failure() => {
            warn!(error = %e, "rejected inbound request");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": e.to_string()})),
            )
                .into_response())
        }
        Err(e) => {
            warn!(error = %e, "malformed inbound request");
            Err(malformed(&e.to_string()))
        }
    }
}

fn malformed(detail: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"error": detail}))).into_response()
}

fn ok_ack() -> Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

/// Publish a verified event; delivery problems never change the ack.
async fn publish(state: &GatewayState, event: InboundEvent) {
    if let Err(e) = state.bus.publish_inbound(event).await {
        error!(error = %e, "failed to publish inbound event");
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
