use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dialogflow v2 webhook request, reduced to the fields the dispatcher needs.
/// The platform sends considerably more; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub query_result: QueryResult,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    pub intent: Intent,
    /// Slot values keyed by parameter name, e.g. {"deviceName": "kitchen"}
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Human-readable intent name the dispatcher matches on
    pub display_name: String,
}

impl QueryResult {
    /// Read a string slot value, treating an absent or empty slot as missing.
    pub fn string_parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Dialogflow v2 webhook response carrying plain fulfillment text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

impl WebhookResponse {
    pub fn speech(text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: text.into(),
        }
    }
}
