use lambda_http::{Body, Request, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::repo::fleet::DynamoFleetStore;
use blinky_backend::{
    validate_device_id, validate_device_name, validate_mac_address, validate_rssi, Clock,
    DeviceCheckin, DeviceConfig, ValidationError,
};

/// Request payload for a periodic device check-in.
///
/// The embedded config is the device's own view of its configuration at
/// check-in time; it is stored as-is and may lag behind the live record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinRequest {
    pub device_id: String,
    pub config: ConfigSnapshot,
    pub mac: String,
    pub ip: String,
    pub rssi: i32,
}

/// Config snapshot as reported by the device (no key inside; the record is
/// keyed by the surrounding device_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub enabled: bool,
    pub mode: String,
}

/// Response payload for a recorded check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinResponse {
    pub status: String,
    pub device_id: String,
    /// Server-side receipt instant, epoch milliseconds; also the timestamp
    /// stored on the check-in record
    pub timestamp: i64,
}

/// Handle device check-in reports
///
/// Overwrites the device's single check-in record (no history is retained).
/// The device must be registered; an unknown device id is a 404, not an
/// implicit registration.
pub async fn handle_checkin(
    event: Request,
    request_id: &str,
    store: &DynamoFleetStore,
    clock: &dyn Clock,
) -> Result<Response<Body>, ApiError> {
    info!(request_id = %request_id, "Processing check-in report");

    let body_bytes = match event.body() {
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
        Body::Empty => {
            return Err(ApiError::MissingField("request body".to_string()));
        }
    };

    let request: CheckinRequest = serde_json::from_slice(body_bytes).map_err(|e| {
        warn!(request_id = %request_id, error = %e, "Failed to parse request body");
        ApiError::Validation(ValidationError::new("body", format!("Invalid JSON: {}", e)))
    })?;

    validate_device_id(&request.device_id)?;
    validate_mac_address(&request.mac)?;
    validate_rssi(request.rssi)?;

    if let Some(name) = &request.config.name {
        validate_device_name(name)?;
    }

    info!(
        request_id = %request_id,
        device_id = %request.device_id,
        mac = %request.mac,
        rssi = request.rssi,
        "Parsed check-in report"
    );

    // Check-ins are only accepted from registered devices
    if store.get_config(&request.device_id).await?.is_none() {
        warn!(
            request_id = %request_id,
            device_id = %request.device_id,
            "Check-in from unregistered device"
        );
        return Err(ApiError::DeviceNotFound(request.device_id));
    }

    let timestamp_ms = clock.now_epoch_millis();

    let checkin = DeviceCheckin {
        device_id: request.device_id.clone(),
        config: DeviceConfig {
            device_id: request.device_id.clone(),
            name: request.config.name,
            enabled: request.config.enabled,
            mode: request.config.mode,
        },
        timestamp_ms,
        mac: request.mac,
        ip: request.ip,
        rssi: request.rssi,
    };

    store.put_checkin(&checkin).await?;

    let response = CheckinResponse {
        status: "recorded".to_string(),
        device_id: checkin.device_id,
        timestamp: timestamp_ms,
    };

    let body = serde_json::to_string(&response)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize response: {}", e)))?;

    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
