use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_attribute_value, to_item};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::config::Config;
use blinky_backend::shared::domain::{DeviceCheckin, DeviceConfig, GlobalPolicy};
use blinky_backend::shared::store::{DeviceStore, PolicyStore, StoreError};

/// Key of the singleton policy record in the globals table.
const GLOBAL_POLICY_ID: &str = "global";

/// DynamoDB-backed implementation of the device and policy stores.
///
/// Three tables mirror the original logical collections: `strips` keyed by
/// `device_id`, `checkin` keyed by `device_id`, and `globals` holding the
/// single policy record. Scans are collected fully and sorted by device id
/// in memory; the fleet is small by design and the listing contract has no
/// pagination.
#[derive(Debug, Clone)]
pub struct DynamoFleetStore {
    client: DynamoDbClient,
    strips_table: String,
    checkins_table: String,
    globals_table: String,
}

impl DynamoFleetStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client: config.dynamodb_client.clone(),
            strips_table: config.strips_table.clone(),
            checkins_table: config.checkins_table.clone(),
            globals_table: config.globals_table.clone(),
        }
    }

    /// Scan a whole table, following pagination until the snapshot is
    /// complete. The full item list is materialized before the caller acts
    /// on any of it.
    async fn scan_all(
        &self,
        table_name: &str,
    ) -> Result<Vec<HashMap<String, AttributeValue>>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let mut request = self.client.scan().table_name(table_name);
            if let Some(key) = start_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let result = request
                .send()
                .await
                .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

            items.extend(result.items.unwrap_or_default());

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }

    /// Get one device's configuration record, or `None` when the device is
    /// not registered.
    pub async fn get_config(&self, device_id: &str) -> Result<Option<DeviceConfig>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.strips_table)
            .key("device_id", AttributeValue::S(device_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

        match result.item {
            Some(item) => {
                let config =
                    from_item(item).map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// Write a whole device configuration record (registration path).
    pub async fn put_config(&self, config: &DeviceConfig) -> Result<(), StoreError> {
        let item = to_item(config).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.strips_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

        Ok(())
    }

    /// Overwrite a device's single check-in record.
    pub async fn put_checkin(&self, checkin: &DeviceCheckin) -> Result<(), StoreError> {
        let item = to_item(checkin).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.checkins_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

        Ok(())
    }
}

impl DeviceStore for DynamoFleetStore {
    async fn list_configs(&self) -> Result<Vec<DeviceConfig>, StoreError> {
        let items = self.scan_all(&self.strips_table).await?;

        let mut configs: Vec<DeviceConfig> = items
            .into_iter()
            .filter_map(|item| match from_item(item) {
                Ok(config) => Some(config),
                Err(e) => {
                    // A malformed record is skipped, never aborts the scan
                    warn!(table = %self.strips_table, error = %e, "Skipping malformed device record");
                    None
                }
            })
            .collect();

        configs.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(configs)
    }

    async fn list_checkins(&self) -> Result<Vec<DeviceCheckin>, StoreError> {
        let items = self.scan_all(&self.checkins_table).await?;

        let mut checkins: Vec<DeviceCheckin> = items
            .into_iter()
            .filter_map(|item| match from_item(item) {
                Ok(checkin) => Some(checkin),
                Err(e) => {
                    warn!(table = %self.checkins_table, error = %e, "Skipping malformed check-in record");
                    None
                }
            })
            .collect();

        checkins.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(checkins)
    }

    async fn set_config_field(
        &self,
        device_id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let attr = to_attribute_value(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Expression attribute name because config fields ("name", "mode")
        // collide with DynamoDB reserved words
        self.client
            .update_item()
            .table_name(&self.strips_table)
            .key("device_id", AttributeValue::S(device_id.to_string()))
            .condition_expression("attribute_exists(device_id)")
            .update_expression("SET #field = :value")
            .expression_attribute_names("#field", field)
            .expression_attribute_values(":value", attr)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    StoreError::UnknownDevice(device_id.to_string())
                } else {
                    StoreError::Unavailable(format!("{:?}", service_error))
                }
            })?;

        Ok(())
    }
}

impl PolicyStore for DynamoFleetStore {
    async fn put_policy(&self, policy: GlobalPolicy) -> Result<(), StoreError> {
        let mut item = to_item(&policy).map_err(|e| StoreError::Serialization(e.to_string()))?;
        item.insert(
            "policy_id".to_string(),
            AttributeValue::S(GLOBAL_POLICY_ID.to_string()),
        );

        self.client
            .put_item()
            .table_name(&self.globals_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

        Ok(())
    }

    async fn get_policy(&self) -> Result<Option<GlobalPolicy>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.globals_table)
            .key("policy_id", AttributeValue::S(GLOBAL_POLICY_ID.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

        match result.item {
            Some(item) => {
                let policy =
                    from_item(item).map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(policy))
            }
            None => Ok(None),
        }
    }
}
