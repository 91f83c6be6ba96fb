//! HTTP transport: webhook intake and health probe.
//!
//! One route does the work: `POST /webhooks/orders`. The handler takes the
//! body as raw bytes so signature verification covers the exact wire form;
//! JSON parsing happens only after the delivery authenticates. Non-POST
//! methods on the route get the router's 405. `GET /health` answers
//! platform liveness checks.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;

use crate::config::Config;
use crate::eligibility::WebhookTopic;
use crate::error::ProcessError;
use crate::reconcile::{self, OrderEvent};
use crate::signature;
use crate::store::OrderStore;

/// Shopify webhook headers (header names are matched case-insensitively).
pub const TOPIC_HEADER: &str = "x-shopify-topic";
pub const HMAC_HEADER: &str = "x-shopify-hmac-sha256";

/// Shared handler state: immutable config plus the live store client.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn OrderStore>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhooks/orders", post(handle_order_webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn handle_order_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let provided = headers.get(HMAC_HEADER).and_then(|v| v.to_str().ok());
    if !signature::verify_webhook(&body, provided, &state.config.webhook_secret) {
        // Log presence only — signature material stays out of the logs.
        log::warn!(
            "webhook rejected: signature verification failed (header {})",
            if provided.is_some() { "present" } else { "absent" }
        );
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }

    let topic = headers
        .get(TOPIC_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let topic = WebhookTopic::from_header(topic);

    let event: OrderEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            log::error!("webhook body did not parse as an order payload: {e}");
            return ProcessError::MalformedPayload(e.to_string()).into_response();
        }
    };

    match reconcile::reconcile_order(
        state.store.as_ref(),
        &event,
        &topic,
        Utc::now(),
        state.config.order_update_window_secs,
        state.config.tag_date_format,
    )
    .await
    {
        Ok(outcome) => {
            log::debug!("order {} ({}): {:?}", event.id, topic.as_str(), outcome);
            (StatusCode::OK, "ok").into_response()
        }
        Err(e) => {
            log::error!("order {} ({}): {}", event.id, topic.as_str(), e);
            e.into_response()
        }
    }
}
