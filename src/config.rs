use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::time::Duration;

/// Configuration shared by the webhook and check-in planes
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB client
    pub dynamodb_client: DynamoDbClient,
    /// Device configuration table ("strips" collection)
    pub strips_table: String,
    /// Device telemetry table ("checkin" collection)
    pub checkins_table: String,
    /// Fleet-wide policy table ("globals" collection)
    pub globals_table: String,
}

impl Config {
    /// Create a new Config instance from environment variables
    pub async fn from_env() -> Result<Self, ConfigError> {
        // Table names first, so a misconfigured deployment fails before any
        // AWS calls are attempted
        let strips_table = std::env::var("STRIPS_TABLE")
            .map_err(|_| ConfigError::MissingEnvVar("STRIPS_TABLE".to_string()))?;

        let checkins_table = std::env::var("CHECKINS_TABLE")
            .map_err(|_| ConfigError::MissingEnvVar("CHECKINS_TABLE".to_string()))?;

        let globals_table = std::env::var("GLOBALS_TABLE")
            .map_err(|_| ConfigError::MissingEnvVar("GLOBALS_TABLE".to_string()))?;

        // Load AWS configuration with behavior version
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        // Create DynamoDB client with appropriate timeouts
        let dynamodb_config = aws_sdk_dynamodb::config::Builder::from(&aws_config)
            .timeout_config(
                aws_sdk_dynamodb::config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(25)) // Leave 5s buffer for Lambda timeout
                    .operation_attempt_timeout(Duration::from_secs(10))
                    .build(),
            )
            .build();

        let dynamodb_client = DynamoDbClient::from_conf(dynamodb_config);

        Ok(Config {
            dynamodb_client,
            strips_table,
            checkins_table,
            globals_table,
        })
    }

    /// Create a test configuration with custom table names
    /// This is useful for integration tests with DynamoDB Local
    #[cfg(test)]
    pub async fn for_test(
        endpoint_url: &str,
        strips_table: String,
        checkins_table: String,
        globals_table: String,
    ) -> Self {
        use aws_sdk_dynamodb::config::{Credentials, Region};

        let credentials =
            Credentials::new("test_access_key", "test_secret_key", None, None, "test");

        let dynamodb_config = aws_sdk_dynamodb::config::Builder::new()
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(endpoint_url)
            .timeout_config(
                aws_sdk_dynamodb::config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(10))
                    .operation_attempt_timeout(Duration::from_secs(5))
                    .build(),
            )
            .build();

        let dynamodb_client = DynamoDbClient::from_conf(dynamodb_config);

        Config {
            dynamodb_client,
            strips_table,
            checkins_table,
            globals_table,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_for_test() {
        let config = Config::for_test(
            "http://localhost:8000",
            "test-strips".to_string(),
            "test-checkins".to_string(),
            "test-globals".to_string(),
        )
        .await;

        assert_eq!(config.strips_table, "test-strips");
        assert_eq!(config.checkins_table, "test-checkins");
        assert_eq!(config.globals_table, "test-globals");
    }
}
