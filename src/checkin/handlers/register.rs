use lambda_http::{Body, Request, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::repo::fleet::DynamoFleetStore;
use blinky_backend::shared::store::PolicyStore;
use blinky_backend::{
    validate_device_id, validate_device_name, validate_mac_address, Clock, DeviceConfig,
    IdGenerator,
};

/// Request payload for device registration.
///
/// A device may supply its own stable id (e.g. one burned into firmware); when
/// it does not, the backend assigns one and the device must persist it for
/// all subsequent check-ins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Stable device identifier, assigned by the backend when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Optional human label for the strip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Initial animation mode; defaults to "solid"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Hardware MAC address in format XX:XX:XX:XX:XX:XX
    pub mac: String,
}

/// Response payload for device registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Registration status ("registered" for both new and existing devices)
    pub status: String,

    /// Device identifier the device must present on every check-in
    pub device_id: String,

    /// Whether the strip starts out enabled
    pub enabled: bool,

    /// Timestamp when the registration was processed (RFC3339 format)
    pub registered_at: String,
}

/// Handle device registration requests
///
/// Creates or overwrites the device's configuration record. A brand-new
/// device starts out following the current fleet-wide policy (enabled when no
/// directive has ever been issued); a re-registering device keeps its stored
/// enabled flag.
pub async fn handle_register(
    event: Request,
    request_id: &str,
    store: &DynamoFleetStore,
    clock: &dyn Clock,
    id_generator: &dyn IdGenerator,
) -> Result<Response<Body>, ApiError> {
    info!(request_id = %request_id, "Processing registration request");

    let body_bytes = match event.body() {
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
        Body::Empty => {
            return Err(ApiError::MissingField("request body".to_string()));
        }
    };

    let request: RegisterRequest = serde_json::from_slice(body_bytes).map_err(|e| {
        warn!(request_id = %request_id, error = %e, "Failed to parse request body");
        ApiError::Validation(blinky_backend::ValidationError::new(
            "body",
            format!("Invalid JSON: {}", e),
        ))
    })?;

    validate_mac_address(&request.mac)?;

    if let Some(device_id) = &request.device_id {
        validate_device_id(device_id)?;
    }

    if let Some(name) = &request.name {
        validate_device_name(name)?;
    }

    let device_id = match request.device_id {
        Some(device_id) => device_id,
        None => id_generator.uuid_v4(),
    };

    info!(
        request_id = %request_id,
        device_id = %device_id,
        mac = %request.mac,
        "Parsed registration request"
    );

    let existing = store.get_config(&device_id).await?;

    let enabled = match &existing {
        // Re-registration keeps the stored flag; a fleet-wide directive may
        // have flipped it since the device last booted
        Some(config) => config.enabled,
        None => match store.get_policy().await? {
            Some(policy) => policy.all_enabled,
            None => true,
        },
    };

    let config = DeviceConfig {
        device_id: device_id.clone(),
        name: request.name.or_else(|| existing.as_ref().and_then(|c| c.name.clone())),
        enabled,
        mode: request
            .mode
            .or_else(|| existing.map(|c| c.mode))
            .unwrap_or_else(|| "solid".to_string()),
    };

    store.put_config(&config).await?;

    let response = RegisterResponse {
        status: "registered".to_string(),
        device_id,
        enabled,
        registered_at: clock.now_rfc3339(),
    };

    let body = serde_json::to_string(&response)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize response: {}", e)))?;

    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
