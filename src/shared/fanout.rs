use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{FanoutFailure, FanoutReport, GlobalPolicy};
use crate::store::{DeviceStore, PolicyStore, StoreError};

/// Apply a fleet-wide directive: write the policy record, then propagate one
/// config field to every registered device.
///
/// Ordering: the policy write completes before enumeration begins, and the
/// full device list is materialized before any per-device write is issued,
/// so the policy record is never stale relative to an in-progress fan-out.
///
/// A policy-write or enumeration failure aborts the whole operation with
/// `Err`. Per-device writes are independent: each failure is logged and
/// collected into the report rather than stopping the remaining writes, so a
/// crash or storage error mid-fan-out leaves the policy updated and an
/// arbitrary subset of devices updated. The caller inspects
/// [`FanoutReport::outcome`] to distinguish complete, partial, and failed
/// propagation.
pub async fn apply_fleet_directive<S>(
    store: &S,
    policy: GlobalPolicy,
    field: &str,
    value: Value,
) -> Result<FanoutReport, StoreError>
where
    S: DeviceStore + PolicyStore,
{
    store.put_policy(policy).await?;

    let configs = store.list_configs().await?;

    info!(
        field = %field,
        devices = configs.len(),
        "Fanning out directive to all devices"
    );

    let mut report = FanoutReport {
        field: field.to_string(),
        attempted: configs.len(),
        updated: Vec::with_capacity(configs.len()),
        failures: Vec::new(),
    };

    for config in &configs {
        match store
            .set_config_field(&config.device_id, field, value.clone())
            .await
        {
            Ok(()) => {
                info!(device_id = %config.device_id, field = %field, "Device updated");
                report.updated.push(config.device_id.clone());
            }
            Err(e) => {
                warn!(
                    device_id = %config.device_id,
                    field = %field,
                    error = %e,
                    "Per-device write failed during fan-out"
                );
                report.failures.push(FanoutFailure {
                    device_id: config.device_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        field = %field,
        updated = report.updated.len(),
        failed = report.failures.len(),
        "Fan-out finished"
    );

    Ok(report)
}

/// Enable or disable every Blinky device in the fleet.
///
/// Writes `GlobalPolicy { all_enabled }` and fans out the `enabled` config
/// field.
pub async fn set_fleet_enabled<S>(store: &S, enabled: bool) -> Result<FanoutReport, StoreError>
where
    S: DeviceStore + PolicyStore,
{
    apply_fleet_directive(
        store,
        GlobalPolicy {
            all_enabled: enabled,
        },
        "enabled",
        Value::Bool(enabled),
    )
    .await
}
