use serde::{Deserialize, Serialize};

/// Configuration record for a registered Blinky LED strip.
///
/// Stored in the `strips` collection keyed by `device_id`. Fields are
/// last-writer-wins: fleet-wide directives and individual devices may both
/// update them independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub device_id: String,
    /// Optional human label. Not guaranteed unique across the fleet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub enabled: bool,
    /// Device-defined animation mode (e.g. "rainbow", "solid").
    pub mode: String,
}

/// Telemetry report a device sends on each periodic check-in.
///
/// Stored in the `checkin` collection keyed by `device_id`, one record per
/// device, overwritten on every check-in. The embedded config is the device's
/// own snapshot at check-in time and may be stale relative to the live
/// DeviceConfig; no synchronization between the two is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCheckin {
    pub device_id: String,
    pub config: DeviceConfig,
    /// Check-in instant, epoch milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    pub mac: String,
    pub ip: String,
    /// Signal strength in dBm.
    pub rssi: i32,
}

/// Fleet-wide directives. Singleton record in the `globals` collection,
/// mutated only by the fleet-wide enable/disable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPolicy {
    #[serde(rename = "allEnabled")]
    pub all_enabled: bool,
}

/// Resolved device state returned for a status query.
///
/// All fields come from the device's last check-in record, so `enabled` and
/// `mode` reflect the config snapshot the device reported, not necessarily
/// the live configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub device_id: String,
    pub name: String,
    /// Last check-in instant, epoch milliseconds.
    pub checked_in_at_ms: i64,
    pub mac: String,
    pub ip: String,
    pub rssi: i32,
    pub enabled: bool,
    pub mode: String,
}

/// Outcome of resolving a free-text device name against the registry.
///
/// Match and not-found are mutually exclusive: a successful match never
/// carries the known-name list.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Found(DeviceStatus),
    /// No case-insensitive name match. Carries every configured name in the
    /// registry so the caller can render a helpful message. Records without
    /// a name cannot match and do not appear here.
    NotFound { known_names: Vec<String> },
}

/// One failed per-device write during a fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct FanoutFailure {
    pub device_id: String,
    pub reason: String,
}

/// Result of one fleet-wide directive fan-out.
///
/// The global policy write already succeeded by the time a report exists;
/// the report describes the per-device writes that followed.
#[derive(Debug, Clone, PartialEq)]
pub struct FanoutReport {
    /// Config field the directive targeted.
    pub field: String,
    /// Number of devices enumerated in the snapshot.
    pub attempted: usize,
    /// Device ids whose write succeeded.
    pub updated: Vec<String>,
    /// Per-device write failures, in enumeration order.
    pub failures: Vec<FanoutFailure>,
}

/// Overall classification of a fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanoutOutcome {
    /// Every per-device write succeeded (including the zero-device case).
    Complete,
    /// Some devices updated, some failed.
    Partial,
    /// Every per-device write failed.
    Failed,
}

impl FanoutReport {
    pub fn outcome(&self) -> FanoutOutcome {
        if self.failures.is_empty() {
            FanoutOutcome::Complete
        } else if self.updated.is_empty() {
            FanoutOutcome::Failed
        } else {
            FanoutOutcome::Partial
        }
    }
}
