use regex::Regex;
use std::sync::OnceLock;

/// Validation error type
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation error for field '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Validate MAC address format (XX:XX:XX:XX:XX:XX with uppercase hex)
pub fn validate_mac_address(mac: &str) -> Result<(), ValidationError> {
    static MAC_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = MAC_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9A-F]{2}:[0-9A-F]{2}:[0-9A-F]{2}:[0-9A-F]{2}:[0-9A-F]{2}:[0-9A-F]{2}$")
            .unwrap()
    });

    if regex.is_match(mac) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "mac",
            "MAC address must be in format XX:XX:XX:XX:XX:XX with uppercase hexadecimal",
        ))
    }
}

/// Validate a device id key.
///
/// Device ids are opaque, max 64 chars, limited to characters that are safe
/// in a storage key (alphanumeric, underscore, hyphen).
pub fn validate_device_id(device_id: &str) -> Result<(), ValidationError> {
    static DEVICE_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DEVICE_ID_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

    if regex.is_match(device_id) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "device_id",
            "Device id must be 1-64 characters of [A-Za-z0-9_-]",
        ))
    }
}

/// Validate a human device name.
/// Names are optional on the record; when present they are max 64 chars of
/// printable ASCII.
pub fn validate_device_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("name", "Device name cannot be empty"));
    }

    if name.len() > 64 {
        return Err(ValidationError::new(
            "name",
            format!(
                "Device name length {} exceeds maximum of 64 characters",
                name.len()
            ),
        ));
    }

    if !name.chars().all(|c| c.is_ascii() && (' '..='~').contains(&c)) {
        return Err(ValidationError::new(
            "name",
            "Device name must contain only printable ASCII characters (0x20-0x7E)",
        ));
    }

    Ok(())
}

/// Validate a reported RSSI value.
/// WiFi signal strength is a negative dBm figure; 0 and below -120 are not
/// values real radios report.
pub fn validate_rssi(rssi: i32) -> Result<(), ValidationError> {
    if (-120..0).contains(&rssi) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "rssi",
            format!("RSSI {} dBm is outside the plausible range [-120, 0)", rssi),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mac_address() {
        // Valid MAC addresses
        assert!(validate_mac_address("AA:BB:CC:DD:EE:FF").is_ok());
        assert!(validate_mac_address("00:11:22:33:44:55").is_ok());
        assert!(validate_mac_address("FF:FF:FF:FF:FF:FF").is_ok());

        // Invalid MAC addresses
        assert!(validate_mac_address("aa:bb:cc:dd:ee:ff").is_err()); // lowercase
        assert!(validate_mac_address("AA:BB:CC:DD:EE").is_err()); // too short
        assert!(validate_mac_address("AA:BB:CC:DD:EE:FF:00").is_err()); // too long
        assert!(validate_mac_address("AA-BB-CC-DD-EE-FF").is_err()); // wrong separator
        assert!(validate_mac_address("AABBCCDDEEFF").is_err()); // no separator
        assert!(validate_mac_address("GG:BB:CC:DD:EE:FF").is_err()); // invalid hex
    }

    #[test]
    fn test_validate_device_id() {
        // Valid device ids
        assert!(validate_device_id("k1").is_ok());
        assert!(validate_device_id("strip-01").is_ok());
        assert!(validate_device_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_device_id(&"a".repeat(64)).is_ok());

        // Invalid device ids
        assert!(validate_device_id("").is_err());
        assert!(validate_device_id(&"a".repeat(65)).is_err());
        assert!(validate_device_id("strip 01").is_err()); // space
        assert!(validate_device_id("strips/k1").is_err()); // path separator
        assert!(validate_device_id("k1\n").is_err()); // control character
    }

    #[test]
    fn test_validate_device_name() {
        // Valid names
        assert!(validate_device_name("Kitchen").is_ok());
        assert!(validate_device_name("Front Porch").is_ok());
        assert!(validate_device_name("strip_2").is_ok());
        assert!(validate_device_name(&"a".repeat(64)).is_ok());

        // Invalid names
        assert!(validate_device_name("").is_err());
        assert!(validate_device_name(&"a".repeat(65)).is_err());
        assert!(validate_device_name("kitchen\nstrip").is_err());
        assert!(validate_device_name("kitchen\x00").is_err());
    }

    #[test]
    fn test_validate_rssi() {
        // Valid RSSI values
        assert!(validate_rssi(-1).is_ok());
        assert!(validate_rssi(-60).is_ok());
        assert!(validate_rssi(-120).is_ok());

        // Invalid RSSI values
        assert!(validate_rssi(0).is_err());
        assert!(validate_rssi(30).is_err());
        assert!(validate_rssi(-121).is_err());
    }
}
