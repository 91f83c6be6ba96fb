//! Processing error taxonomy for webhook handling.
//!
//! Only two things can go wrong once a delivery is authenticated: the body
//! is not the expected shape, or the order store fails. Both surface as a
//! 500 with a generic body — internal detail stays in the logs, and the
//! webhook sender's redelivery policy takes it from there. No-op outcomes
//! (ineligible event, no directive, nothing changed) are not errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::StoreError;

/// Failures while processing an authenticated webhook delivery.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Body did not deserialize as an order webhook payload.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The order store failed a fetch or update.
    #[error("Order store: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        // Response bodies never carry internal detail; callers only need
        // to know whether to redeliver.
        (StatusCode::INTERNAL_SERVER_ERROR, "processing failed").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_process_errors_map_to_500() {
        let errors = [
            ProcessError::MalformedPayload("bad json".to_string()),
            ProcessError::Store(StoreError::Api {
                status: 404,
                message: "not found".to_string(),
            }),
        ];
        for error in errors {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
