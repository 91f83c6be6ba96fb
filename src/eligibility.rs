//! Mutation eligibility gate.
//!
//! Creation events are always the service's first look at an order.
//! Update events are only acted on inside a bounded window after the order
//! was created; past that window the note belongs to whoever edited it
//! last, and the service keeps its hands off.

use chrono::{DateTime, Utc};

/// Webhook event kind, from the `X-Shopify-Topic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookTopic {
    OrderCreated,
    OrderUpdated,
    Other(String),
}

impl WebhookTopic {
    pub fn from_header(value: &str) -> Self {
        match value.trim() {
            "orders/create" => Self::OrderCreated,
            "orders/updated" => Self::OrderUpdated,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::OrderCreated => "orders/create",
            Self::OrderUpdated => "orders/updated",
            Self::Other(raw) => raw,
        }
    }
}

/// Whether automated mutation is permitted for this event.
///
/// Updates are eligible only when `created_at` parses as RFC 3339 and the
/// order's age sits inside `[0, window_secs]`, endpoints included. A
/// missing or unparsable `created_at` fails closed.
pub fn is_eligible(
    topic: &WebhookTopic,
    created_at: Option<&str>,
    now: DateTime<Utc>,
    window_secs: i64,
) -> bool {
    match topic {
        WebhookTopic::OrderCreated => true,
        WebhookTopic::OrderUpdated => {
            let Some(raw) = created_at else {
                return false;
            };
            let Ok(created) = DateTime::parse_from_rfc3339(raw) else {
                return false;
            };
            let age = now
                .signed_duration_since(created.with_timezone(&Utc))
                .num_seconds();
            (0..=window_secs).contains(&age)
        }
        WebhookTopic::Other(_) => false,
    }
}
