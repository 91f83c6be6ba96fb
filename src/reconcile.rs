//! Reconciliation of one order: note directive → canonical tag.
//!
//! Each webhook delivery drives one stateless pass: gate, extract, fetch,
//! compute, write-if-changed. The webhook payload is only a trigger — the
//! note and tags that get written are always computed from a fresh fetch,
//! because the payload may be stale against concurrent edits. Two passes
//! racing on the same order converge on the same state: stripping and
//! normalization are idempotent, so the loser's write is redundant, not
//! wrong.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::directive;
use crate::eligibility::{self, WebhookTopic};
use crate::error::ProcessError;
use crate::store::{OrderStore, OrderUpdate};
use crate::tags::{self, TagDateFormat};

/// Order snapshot carried in the webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEvent {
    #[serde(deserialize_with = "crate::store::de_opaque_id")]
    pub id: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Outcome of one reconciliation pass. Every variant is a success to the
/// webhook sender; they differ only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Event kind or window did not permit automated mutation.
    Ineligible,
    /// The note snapshot carried no delivery-date directive.
    NoDirective,
    /// Fetched state was already reconciled; no write issued.
    Unchanged,
    /// One combined note+tags write was issued.
    Updated,
}

/// Run one reconciliation pass for an authenticated event.
///
/// The directive is extracted from the event's note snapshot; if none is
/// found the store is not contacted at all. When a write is needed it is
/// a single update carrying both the stripped note and the normalized
/// tag string.
pub async fn reconcile_order(
    store: &dyn OrderStore,
    event: &OrderEvent,
    topic: &WebhookTopic,
    now: DateTime<Utc>,
    window_secs: i64,
    format: TagDateFormat,
) -> Result<Outcome, ProcessError> {
    if !eligibility::is_eligible(topic, event.created_at.as_deref(), now, window_secs) {
        log::info!(
            "order {}: {} outside the mutation window, leaving note alone",
            event.id,
            topic.as_str()
        );
        return Ok(Outcome::Ineligible);
    }

    let snapshot_note = event.note.as_deref().unwrap_or("");
    let Some(date) = directive::extract_delivery_date(snapshot_note) else {
        return Ok(Outcome::NoDirective);
    };

    let order = store.fetch_order(&event.id).await?;

    let current_note = order.note.as_deref().unwrap_or("");
    let (cleaned_note, note_changed) = directive::strip_directives(current_note);

    let current_tags = tags::split_tags(&order.tags);
    let normalized = tags::normalize_tags(&current_tags, &date, format);
    let new_tags = tags::join_tags(&normalized);
    let tags_changed = new_tags != order.tags;

    if !note_changed && !tags_changed {
        log::debug!("order {}: already reconciled, nothing to write", event.id);
        return Ok(Outcome::Unchanged);
    }

    let update = OrderUpdate {
        note: Some(cleaned_note),
        tags: Some(new_tags),
    };
    store.update_order(&order.id, &update).await?;
    log::info!(
        "order {}: tagged delivery date {:02}-{:02}-{:04} (note changed: {}, tags changed: {})",
        order.id,
        date.day,
        date.month,
        date.year,
        note_changed,
        tags_changed
    );
    Ok(Outcome::Updated)
}
