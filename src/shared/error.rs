use serde::{Deserialize, Serialize};

/// Standard error response payload for the device-facing API.
/// Contains stable machine-readable error code, human-readable message, and
/// request ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code (e.g., "INVALID_MAC", "DEVICE_NOT_FOUND")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Request ID for tracing and debugging
    pub request_id: String,
}

impl ErrorResponse {
    pub fn new(
        error: impl Into<String>,
        message: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            request_id: request_id.into(),
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Common error codes used across the API
pub mod error_codes {
    // Validation errors
    pub const MISSING_FIELD: &str = "MISSING_FIELD";
    pub const INVALID_FORMAT: &str = "INVALID_FORMAT";
    pub const INVALID_MAC: &str = "INVALID_MAC";
    pub const INVALID_DEVICE_ID: &str = "INVALID_DEVICE_ID";
    pub const INVALID_RSSI: &str = "INVALID_RSSI";

    // Not found errors
    pub const DEVICE_NOT_FOUND: &str = "DEVICE_NOT_FOUND";
    pub const NOT_FOUND: &str = "NOT_FOUND";

    // Storage errors
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";

    // Internal errors
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}
