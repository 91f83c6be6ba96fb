//! Webhook signature verification.
//!
//! Shopify signs each delivery with HMAC-SHA256 over the raw request body
//! and sends the MAC base64-encoded in the `X-Shopify-Hmac-Sha256` header.
//! Verification runs on the exact wire bytes, before any JSON parsing —
//! re-encoding the body first (even whitespace) would change the MAC.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook delivery against the shared secret.
///
/// Returns `false` for a missing, empty, or undecodable signature header
/// and for any MAC mismatch; never panics. The comparison itself is
/// constant-time (`Mac::verify_slice`).
pub fn verify_webhook(raw_body: &[u8], provided: Option<&str>, secret: &str) -> bool {
    let Some(provided) = provided.map(str::trim).filter(|s| !s.is_empty()) else {
        return false;
    };
    let Ok(provided_bytes) = BASE64.decode(provided.as_bytes()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(raw_body);
    mac.verify_slice(&provided_bytes).is_ok()
}
