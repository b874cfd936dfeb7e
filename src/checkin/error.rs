use lambda_http::{Body, Response};
use thiserror::Error;

use blinky_backend::shared::error::{error_codes, ErrorResponse};
use blinky_backend::shared::store::StoreError;
use blinky_backend::shared::validators::ValidationError;

/// Main error type for the device-facing check-in API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Device not registered: {0}")]
    DeviceNotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Convert error to HTTP response with appropriate status code and error payload
    pub fn to_http_response(&self, request_id: &str) -> Response<Body> {
        let (status, error_code, message): (u16, &str, String) = match self {
            ApiError::MissingField(field) => (
                400,
                error_codes::MISSING_FIELD,
                format!("Required field missing: {}", field),
            ),
            ApiError::Validation(e) => {
                let code = match e.field.as_str() {
                    "mac" => error_codes::INVALID_MAC,
                    "device_id" => error_codes::INVALID_DEVICE_ID,
                    "rssi" => error_codes::INVALID_RSSI,
                    _ => error_codes::INVALID_FORMAT,
                };
                (400, code, e.to_string())
            }
            ApiError::DeviceNotFound(device_id) => (
                404,
                error_codes::DEVICE_NOT_FOUND,
                format!("Device {} is not registered", device_id),
            ),
            ApiError::Store(_) => (
                500,
                error_codes::STORAGE_ERROR,
                "Internal storage error occurred".to_string(),
            ),
            ApiError::Internal(_) => (
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
    use blinky_backend::shared::validators::validate_mac_address;

    #[test]
    fn test_validation_error_uses_field_specific_code() {
        let validation_error = validate_mac_address("not-a-mac").unwrap_err();
        let response = ApiError::Validation(validation_error).to_http_response("req-1");

        assert_eq!(response.status(), 400);
        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };
        assert!(body.contains("INVALID_MAC"));
        assert!(body.contains("req-1"));
    }

    #[test]
    fn test_device_not_found_maps_to_404() {
        let response = ApiError::DeviceNotFound("k9".to_string()).to_http_response("req-2");

        assert_eq!(response.status(), 404);
        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };
        assert!(body.contains("DEVICE_NOT_FOUND"));
        assert!(body.contains("k9"));
    }

    #[test]
    fn test_store_error_maps_to_500() {
        let response = ApiError::Store(StoreError::Unavailable("timeout".to_string()))
            .to_http_response("req-3");

        assert_eq!(response.status(), 500);
        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };
        assert!(body.contains("STORAGE_ERROR"));
        assert!(!body.contains("timeout"));
    }
}
