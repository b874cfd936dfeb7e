use lambda_http::{Body, Response};
use thiserror::Error;

use blinky_backend::shared::error::{error_codes, ErrorResponse};
use blinky_backend::shared::store::StoreError;

/// Main error type for the webhook plane.
///
/// Only platform-level problems surface as HTTP errors. A storage failure
/// during intent handling is rendered as apology speech instead, so the
/// voice interaction is never left unanswered.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Malformed webhook request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// Convert error to HTTP response with appropriate status code and error payload
    pub fn to_http_response(&self, request_id: &str) -> Response<Body> {
        let (status, error_code, message): (u16, &str, String) = match self {
            WebhookError::BadRequest(msg) => (400, error_codes::INVALID_FORMAT, msg.clone()),
            WebhookError::Store(_) => (
                500,
                error_codes::STORAGE_ERROR,
                "Internal storage error occurred".to_string(),
            ),
            WebhookError::Internal(_) => (
                500,
                error_codes::INTERNAL_ERROR,
                "Internal server error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse::new(error_code, &message, request_id);

        let body = error_response
            .to_json()
            .unwrap_or_else(|_| r#"{"error":"INTERNAL_ERROR","message":"Failed to serialize error response","request_id":""}"#.to_string());

        Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(500)
                    .body(Body::from(
                        r#"{"error":"INTERNAL_ERROR","message":"Failed to build response"}"#,
                    ))
                    .unwrap()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_400() {
        let error = WebhookError::BadRequest("Invalid JSON: missing queryResult".to_string());
        let response = error.to_http_response("req-123");

        assert_eq!(response.status(), 400);

        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };

        assert!(body.contains("INVALID_FORMAT"));
        assert!(body.contains("req-123"));
    }

    #[test]
    fn test_store_error_maps_to_500() {
        let error = WebhookError::Store(StoreError::Unavailable("timeout".to_string()));
        let response = error.to_http_response("req-456");

        assert_eq!(response.status(), 500);

        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };

        assert!(body.contains("STORAGE_ERROR"));
        // Raw storage detail stays in the logs, not the response
        assert!(!body.contains("timeout"));
    }
}
