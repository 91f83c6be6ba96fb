//! Shopify Admin API client for order reads and writes.
//!
//! The engine needs exactly two operations from the store: fetch an
//! order's current tags and note, and write both back in one partial
//! update. [`OrderStore`] is the seam; [`ShopifyStore`] is the production
//! implementation over the Admin REST API. No internal retry — webhook
//! redelivery is the sender's job, so a failed call surfaces as an error
//! and the delivery is retried whole.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// An order as the engine sees it: opaque id, comma-delimited tags, note.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "de_opaque_id")]
    pub id: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Partial order write. `None` fields are omitted from the request body
/// and left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Errors from order store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),
}

/// Read/write access to order state.
///
/// Fetch must return current field values, not a cached snapshot: the
/// orchestrator always computes mutations against a just-fetched order,
/// never against the webhook payload.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn fetch_order(&self, id: &str) -> Result<Order, StoreError>;
    async fn update_order(&self, id: &str, update: &OrderUpdate) -> Result<(), StoreError>;
}

// ============================================================================
// Shopify Admin REST implementation
// ============================================================================

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Debug, Serialize)]
struct UpdateEnvelope<'a> {
    order: UpdateBody<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    id: &'a str,
    #[serde(flatten)]
    update: &'a OrderUpdate,
}

/// Admin REST API client for one shop.
pub struct ShopifyStore {
    client: reqwest::Client,
    base: Url,
    access_token: String,
    api_version: String,
}

impl ShopifyStore {
    pub fn new(
        shop_url: &str,
        access_token: &str,
        api_version: &str,
    ) -> Result<Self, StoreError> {
        let base = Url::parse(shop_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base,
            access_token: access_token.to_string(),
            api_version: api_version.to_string(),
        })
    }

    fn order_url(&self, id: &str) -> Result<Url, StoreError> {
        let path = format!("admin/api/{}/orders/{}.json", self.api_version, id);
        self.base
            .join(&path)
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl OrderStore for ShopifyStore {
    async fn fetch_order(&self, id: &str) -> Result<Order, StoreError> {
        let response = self
            .client
            .get(self.order_url(id)?)
            .header("X-Shopify-Access-Token", &self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let envelope: OrderEnvelope = response.json().await?;
        Ok(envelope.order)
    }

    async fn update_order(&self, id: &str, update: &OrderUpdate) -> Result<(), StoreError> {
        let body = UpdateEnvelope {
            order: UpdateBody { id, update },
        };
        let response = self
            .client
            .put(self.order_url(id)?)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// Webhook and Admin API payloads carry order ids as JSON numbers; the
/// engine treats ids as opaque strings. Accept both on read.
pub(crate) fn de_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(i64),
        Str(String),
    }
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(n) => n.to_string(),
        IdRepr::Str(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_deserializes_numeric_and_string_ids() {
        let numeric: Order =
            serde_json::from_str(r#"{"id":450789469,"tags":"urgent","note":"hi"}"#).unwrap();
        assert_eq!(numeric.id, "450789469");

        let string: Order = serde_json::from_str(r#"{"id":"gid-123","tags":""}"#).unwrap();
        assert_eq!(string.id, "gid-123");
        assert_eq!(string.note, None);
    }

    #[test]
    fn update_envelope_omits_unset_fields() {
        let update = OrderUpdate {
            note: Some("cleaned".to_string()),
            tags: None,
        };
        let body = UpdateEnvelope {
            order: UpdateBody {
                id: "42",
                update: &update,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["order"]["note"], "cleaned");
        assert_eq!(json["order"]["id"], "42");
        assert!(json["order"].get("tags").is_none());
    }

    #[test]
    fn order_url_shape() {
        let store =
            ShopifyStore::new("https://example.myshopify.com", "token", "2024-01").unwrap();
        let url = store.order_url("450789469").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.myshopify.com/admin/api/2024-01/orders/450789469.json"
        );
    }
}
