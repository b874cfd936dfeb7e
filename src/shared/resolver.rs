use tracing::info;

use crate::domain::{DeviceConfig, DeviceStatus, ResolveOutcome};
use crate::store::{DeviceStore, StoreError};

/// Resolve a free-text device name to the device's last-known state.
///
/// Scans a snapshot of the check-in records in device-id order and returns
/// the first record whose configured name equals the query case-insensitively.
/// When several devices share a name, first match in device-id order wins; the
/// tie-break is deterministic, not best-match. Records whose embedded config
/// carries no name can never match and are also excluded from the known-name
/// list returned on a miss.
pub async fn resolve_device<S>(store: &S, query: &str) -> Result<ResolveOutcome, StoreError>
where
    S: DeviceStore,
{
    let checkins = store.list_checkins().await?;

    info!(query = %query, checkins = checkins.len(), "Resolving device name");

    let wanted = query.to_lowercase();

    for checkin in &checkins {
        let Some(name) = &checkin.config.name else {
            continue;
        };

        if name.to_lowercase() == wanted {
            return Ok(ResolveOutcome::Found(DeviceStatus {
                device_id: checkin.device_id.clone(),
                name: name.clone(),
                checked_in_at_ms: checkin.timestamp_ms,
                mac: checkin.mac.clone(),
                ip: checkin.ip.clone(),
                rssi: checkin.rssi,
                enabled: checkin.config.enabled,
                mode: checkin.config.mode.clone(),
            }));
        }
    }

    let known_names = checkins
        .iter()
        .filter_map(|c| c.config.name.clone())
        .collect();

    Ok(ResolveOutcome::NotFound { known_names })
}

/// One label per registered device, in device-id order.
///
/// Named devices contribute their name; a config without a name contributes
/// the `unnamed, key=<device_id>` placeholder so no device is ever omitted
/// from the roster. Rendering the labels into a sentence happens at the
/// intent boundary.
pub fn device_roster(configs: &[DeviceConfig]) -> Vec<String> {
    configs
        .iter()
        .map(|config| match &config.name {
            Some(name) => name.clone(),
            None => format!("unnamed, key={}", config.device_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::memory::InMemoryFleetStore;

    fn store_with_checkins() -> InMemoryFleetStore {
        let store = InMemoryFleetStore::new();
        store.add_checkin(
            "k1",
            Some("Kitchen"),
            1705314600000,
            "AA:BB",
            "10.0.0.5",
            -60,
        );
        store.add_checkin(
            "k2",
            Some("Porch"),
            1705314700000,
            "CC:DD",
            "10.0.0.6",
            -72,
        );
        store
    }

    #[tokio::test]
    async fn test_resolve_is_case_insensitive() {
        let store = store_with_checkins();

        let lower = resolve_device(&store, "kitchen").await.unwrap();
        let mixed = resolve_device(&store, "KiTcHeN").await.unwrap();

        assert_eq!(lower, mixed);
        match lower {
            ResolveOutcome::Found(status) => {
                assert_eq!(status.device_id, "k1");
                assert_eq!(status.name, "Kitchen");
                assert_eq!(status.mac, "AA:BB");
                assert_eq!(status.ip, "10.0.0.5");
                assert_eq!(status.rssi, -60);
                assert_eq!(status.checked_in_at_ms, 1705314600000);
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let store = store_with_checkins();

        let first = resolve_device(&store, "porch").await.unwrap();
        let second = resolve_device(&store, "porch").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_match_returns_known_names() {
        let store = store_with_checkins();

        let outcome = resolve_device(&store, "garage").await.unwrap();

        assert_eq!(
            outcome,
            ResolveOutcome::NotFound {
                known_names: vec!["Kitchen".to_string(), "Porch".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_names_first_device_id_wins() {
        let store = InMemoryFleetStore::new();
        store.add_checkin("k2", Some("Kitchen"), 2000, "CC:DD", "10.0.0.6", -72);
        store.add_checkin("k1", Some("Kitchen"), 1000, "AA:BB", "10.0.0.5", -60);

        let outcome = resolve_device(&store, "kitchen").await.unwrap();

        match outcome {
            ResolveOutcome::Found(status) => assert_eq!(status.device_id, "k1"),
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nameless_checkin_is_skipped_without_crashing() {
        let store = InMemoryFleetStore::new();
        store.add_checkin("k0", None, 500, "EE:FF", "10.0.0.4", -80);
        store.add_checkin("k1", Some("Kitchen"), 1000, "AA:BB", "10.0.0.5", -60);

        let outcome = resolve_device(&store, "kitchen").await.unwrap();
        assert!(matches!(outcome, ResolveOutcome::Found(_)));

        // The nameless record is excluded from the fallback name list too
        let miss = resolve_device(&store, "garage").await.unwrap();
        assert_eq!(
            miss,
            ResolveOutcome::NotFound {
                known_names: vec!["Kitchen".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_surfaces_storage_failure() {
        let store = store_with_checkins();
        store.fail_reads();

        let result = resolve_device(&store, "kitchen").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_roster_preserves_order_and_uses_placeholder() {
        let configs = vec![
            DeviceConfig {
                device_id: "k1".to_string(),
                name: Some("Kitchen".to_string()),
                enabled: true,
                mode: "solid".to_string(),
            },
            DeviceConfig {
                device_id: "k2".to_string(),
                name: None,
                enabled: false,
                mode: "solid".to_string(),
            },
            DeviceConfig {
                device_id: "k3".to_string(),
                name: Some("Porch".to_string()),
                enabled: true,
                mode: "rainbow".to_string(),
            },
        ];

        let roster = device_roster(&configs);

        assert_eq!(
            roster,
            vec![
                "Kitchen".to_string(),
                "unnamed, key=k2".to_string(),
                "Porch".to_string(),
            ]
        );
    }

    #[test]
    fn test_roster_of_empty_registry() {
        assert!(device_roster(&[]).is_empty());
    }
}
