//! Test utilities for the fleet backend
//!
//! This module provides proptest generators for domain values (MAC addresses,
//! device ids, device names, RSSI figures) and an in-memory store with
//! failure injection for exercising the fan-out and resolver engines without
//! DynamoDB.

pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid MAC address in XX:XX:XX:XX:XX:XX format
    pub fn mac_address() -> impl Strategy<Value = String> {
        prop::collection::vec(0u8..=255, 6).prop_map(|bytes| {
            bytes
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(":")
        })
    }

    /// Generate an invalid MAC address (wrong format)
    pub fn invalid_mac_address() -> impl Strategy<Value = String> {
        prop_oneof![
            // Too short
            Just("AA:BB:CC:DD:EE".to_string()),
            // Too long
            Just("AA:BB:CC:DD:EE:FF:00".to_string()),
            // Wrong separator
            Just("AA-BB-CC-DD-EE-FF".to_string()),
            // Invalid characters
            Just("GG:HH:II:JJ:KK:LL".to_string()),
            // Missing colons
            Just("AABBCCDDEEFF".to_string()),
            // Empty
            Just("".to_string()),
        ]
    }

    /// Generate a valid device id key
    pub fn device_id() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z0-9_-]{1,64}").expect("Valid regex for device_id")
    }

    /// Generate an invalid device id (empty, too long, or unsafe characters)
    pub fn invalid_device_id() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("".to_string()),
            prop::string::string_regex("[A-Za-z0-9]{65,80}").expect("Valid regex"),
            Just("strips/k1".to_string()),
            Just("device id".to_string()),
            Just("k1\n".to_string()),
        ]
    }

    /// Generate a plausible human device name (letters, digits, spaces)
    pub fn device_name() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z][A-Za-z0-9 ]{0,30}").expect("Valid regex for name")
    }

    /// Generate a plausible RSSI figure in dBm
    pub fn rssi() -> impl Strategy<Value = i32> {
        -120i32..0i32
    }
}

pub mod memory {
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;

    use serde_json::Value;

    use crate::domain::{DeviceCheckin, DeviceConfig, GlobalPolicy};
    use crate::store::{DeviceStore, PolicyStore, StoreError};

    /// In-memory implementation of the device and policy stores.
    ///
    /// `BTreeMap` keys give the same device-id ordering the durable store
    /// contract requires. Failure injection simulates an unreachable backend:
    /// per-device write failures, policy write failures, and read failures.
    #[derive(Debug, Default)]
    pub struct InMemoryFleetStore {
        inner: Mutex<Inner>,
    }

    #[derive(Debug, Default)]
    struct Inner {
        strips: BTreeMap<String, DeviceConfig>,
        checkins: BTreeMap<String, DeviceCheckin>,
        policy: Option<GlobalPolicy>,
        failing_devices: HashSet<String>,
        fail_policy_writes: bool,
        fail_reads: bool,
    }

    impl InMemoryFleetStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a device configuration record.
        pub fn add_config(&self, device_id: &str, name: Option<&str>, enabled: bool, mode: &str) {
            let mut inner = self.inner.lock().unwrap();
            inner.strips.insert(
                device_id.to_string(),
                DeviceConfig {
                    device_id: device_id.to_string(),
                    name: name.map(|n| n.to_string()),
                    enabled,
                    mode: mode.to_string(),
                },
            );
        }

        /// Seed a check-in record with an embedded config snapshot.
        pub fn add_checkin(
            &self,
            device_id: &str,
            name: Option<&str>,
            timestamp_ms: i64,
            mac: &str,
            ip: &str,
            rssi: i32,
        ) {
            let checkin = DeviceCheckin {
                device_id: device_id.to_string(),
                config: DeviceConfig {
                    device_id: device_id.to_string(),
                    name: name.map(|n| n.to_string()),
                    enabled: true,
                    mode: "rainbow".to_string(),
                },
                timestamp_ms,
                mac: mac.to_string(),
                ip: ip.to_string(),
                rssi,
            };
            let mut inner = self.inner.lock().unwrap();
            inner.checkins.insert(device_id.to_string(), checkin);
        }

        /// Seed a fully-specified check-in record.
        pub fn put_checkin(&self, checkin: DeviceCheckin) {
            let mut inner = self.inner.lock().unwrap();
            inner.checkins.insert(checkin.device_id.clone(), checkin);
        }

        /// Make every subsequent write to `device_id` fail.
        pub fn fail_writes_for(&self, device_id: &str) {
            let mut inner = self.inner.lock().unwrap();
            inner.failing_devices.insert(device_id.to_string());
        }

        /// Make every subsequent policy write fail.
        pub fn fail_policy_writes(&self) {
            self.inner.lock().unwrap().fail_policy_writes = true;
        }

        /// Make every subsequent read fail.
        pub fn fail_reads(&self) {
            self.inner.lock().unwrap().fail_reads = true;
        }
    }

    impl DeviceStore for InMemoryFleetStore {
        async fn list_configs(&self) -> Result<Vec<DeviceConfig>, StoreError> {
            let inner = self.inner.lock().unwrap();
            if inner.fail_reads {
                return Err(StoreError::Unavailable("simulated read failure".into()));
            }
            Ok(inner.strips.values().cloned().collect())
        }

        async fn list_checkins(&self) -> Result<Vec<DeviceCheckin>, StoreError> {
            let inner = self.inner.lock().unwrap();
            if inner.fail_reads {
                return Err(StoreError::Unavailable("simulated read failure".into()));
            }
            Ok(inner.checkins.values().cloned().collect())
        }

        async fn set_config_field(
            &self,
            device_id: &str,
            field: &str,
            value: Value,
        ) -> Result<(), StoreError> {
            let mut inner = self.inner.lock().unwrap();

            if inner.failing_devices.contains(device_id) {
                return Err(StoreError::Unavailable("simulated write failure".into()));
            }

            let config = inner
                .strips
                .get(device_id)
                .ok_or_else(|| StoreError::UnknownDevice(device_id.to_string()))?;

            // Apply the field write through the record's JSON representation,
            // the same schemaless shape the durable store uses
            let mut doc = serde_json::to_value(config)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            doc[field] = value;
            let updated: DeviceConfig =
                serde_json::from_value(doc).map_err(|e| StoreError::Serialization(e.to_string()))?;

            inner.strips.insert(device_id.to_string(), updated);
            Ok(())
        }
    }

    impl PolicyStore for InMemoryFleetStore {
        async fn put_policy(&self, policy: GlobalPolicy) -> Result<(), StoreError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_policy_writes {
                return Err(StoreError::Unavailable(
                    "simulated policy write failure".into(),
                ));
            }
            inner.policy = Some(policy);
            Ok(())
        }

        async fn get_policy(&self) -> Result<Option<GlobalPolicy>, StoreError> {
            let inner = self.inner.lock().unwrap();
            if inner.fail_reads {
                return Err(StoreError::Unavailable("simulated read failure".into()));
            }
            Ok(inner.policy)
        }
    }
}
