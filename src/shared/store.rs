use serde_json::Value;
use thiserror::Error;

use crate::domain::{DeviceCheckin, DeviceConfig, GlobalPolicy};

/// Durable storage errors.
///
/// Storage failures propagate to the caller as explicit results; nothing is
/// silently dropped and no fallback values are fabricated.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Access to the two device collections: `strips` (configuration) and
/// `checkin` (telemetry). Both are keyed by the same device-id space.
#[allow(async_fn_in_trait)]
pub trait DeviceStore {
    /// Snapshot of every device configuration, ordered by device id.
    async fn list_configs(&self) -> Result<Vec<DeviceConfig>, StoreError>;

    /// Snapshot of every check-in record, ordered by device id.
    async fn list_checkins(&self) -> Result<Vec<DeviceCheckin>, StoreError>;

    /// Durably write one field of one device's configuration.
    ///
    /// Last-writer-wins per field; concurrent writes to different devices do
    /// not block each other. Fails with [`StoreError::UnknownDevice`] when no
    /// config record exists for `device_id`.
    async fn set_config_field(
        &self,
        device_id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError>;
}

/// Access to the `globals` singleton record.
#[allow(async_fn_in_trait)]
pub trait PolicyStore {
    /// Overwrite the fleet-wide policy record.
    async fn put_policy(&self, policy: GlobalPolicy) -> Result<(), StoreError>;

    /// Read the fleet-wide policy record. `None` when the fleet has never
    /// seen a directive.
    async fn get_policy(&self) -> Result<Option<GlobalPolicy>, StoreError>;
}
