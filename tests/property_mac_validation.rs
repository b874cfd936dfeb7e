//! Property Test: MAC Address Format Validation
//!
//! This property test verifies that:
//! - Valid MAC addresses (XX:XX:XX:XX:XX:XX format) are accepted
//! - Invalid MAC addresses (wrong format, wrong length, invalid chars) are rejected

use blinky_backend::test_utils::generators;
use blinky_backend::validators::validate_mac_address;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: All generated valid MAC addresses should pass validation
    #[test]
    fn prop_valid_mac_addresses_accepted(mac in generators::mac_address()) {
        let result = validate_mac_address(&mac);
        prop_assert!(
            result.is_ok(),
            "Valid MAC address {} should be accepted, but got error: {:?}",
            mac,
            result.err()
        );
    }

    /// Property: All generated invalid MAC addresses should fail validation
    #[test]
    fn prop_invalid_mac_addresses_rejected(mac in generators::invalid_mac_address()) {
        let result = validate_mac_address(&mac);
        prop_assert!(
            result.is_err(),
            "Invalid MAC address {} should be rejected, but was accepted",
            mac
        );
    }
}
