//! notetag — order note → delivery-date tag reconciliation for Shopify.
//!
//! Checkout apps leave a `(Delivery Date: …)` directive in the order note;
//! this service receives order webhooks, verifies them, and reconciles the
//! directive into the order's tag set: the note keeps its human-authored
//! text, the tags end up with exactly one canonical date tag.
//!
//! Modules, leaf-first:
//! - signature: HMAC verification of inbound deliveries
//! - eligibility: which events may still mutate the order
//! - directive: date extraction and note stripping
//! - tags: canonical tag rendering and normalization
//! - reconcile: the per-event orchestration
//! - store: Shopify Admin API client behind the `OrderStore` seam
//! - server: axum transport
//! - config/error: environment configuration and the processing taxonomy

pub mod config;
pub mod directive;
pub mod eligibility;
pub mod error;
pub mod reconcile;
pub mod server;
pub mod signature;
pub mod store;
pub mod tags;
