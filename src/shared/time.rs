use chrono::{DateTime, Utc};

/// Clock trait for abstracting time operations.
///
/// Check-in records are stamped with epoch milliseconds; RFC3339 strings are
/// used for logging and response metadata.
pub trait Clock: Send + Sync {
    /// Current time as milliseconds since the Unix epoch.
    fn now_epoch_millis(&self) -> i64;

    /// Current time as RFC3339 string, e.g. "2024-01-15T10:30:00Z".
    fn now_rfc3339(&self) -> String;
}

/// Production implementation of Clock using system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn now_rfc3339(&self) -> String {
        Utc::now().to_rfc3339()
    }
}

/// Test implementation of Clock with fixed/controllable time
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    /// Create a FixedClock from RFC3339 string
    pub fn from_rfc3339(timestamp_str: &str) -> Result<Self, chrono::ParseError> {
        let timestamp = DateTime::parse_from_rfc3339(timestamp_str)?.with_timezone(&Utc);
        Ok(Self { timestamp })
    }

    /// Create a FixedClock from epoch milliseconds
    pub fn from_epoch_millis(millis: i64) -> Self {
        let timestamp = DateTime::from_timestamp_millis(millis).expect("Invalid timestamp");
        Self { timestamp }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance_millis(&mut self, millis: i64) {
        self.timestamp += chrono::Duration::milliseconds(millis);
    }
}

impl Clock for FixedClock {
    fn now_epoch_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    fn now_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_now_epoch_millis() {
        let clock = SystemClock::new();
        let now = clock.now_epoch_millis();

        // After 2020-01-01, before 2100-01-01
        assert!(now > 1_577_836_800_000);
        assert!(now < 4_102_444_800_000);
    }

    #[test]
    fn test_system_clock_now_rfc3339() {
        let clock = SystemClock::new();
        let now = clock.now_rfc3339();

        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }

    #[test]
    fn test_fixed_clock_from_rfc3339() {
        let clock = FixedClock::from_rfc3339("2024-01-15T10:30:00Z").unwrap();

        assert_eq!(clock.now_epoch_millis(), 1705314600000);
        assert!(clock.now_rfc3339().starts_with("2024-01-15T10:30:00"));
    }

    #[test]
    fn test_fixed_clock_from_epoch_millis() {
        let clock = FixedClock::from_epoch_millis(1705314600000);

        assert_eq!(clock.now_epoch_millis(), 1705314600000);
        assert!(clock.now_rfc3339().contains("2024-01-15"));
    }

    #[test]
    fn test_fixed_clock_advance_millis() {
        let mut clock = FixedClock::from_epoch_millis(1705314600000);

        clock.advance_millis(60_000);

        assert_eq!(clock.now_epoch_millis(), 1705314660000);
    }

    #[test]
    fn test_fixed_clock_deterministic() {
        let clock = FixedClock::from_epoch_millis(1705314600000);

        assert_eq!(clock.now_epoch_millis(), clock.now_epoch_millis());
        assert_eq!(clock.now_rfc3339(), clock.now_rfc3339());
    }

    #[test]
    fn test_clock_trait_object() {
        let system_clock: Box<dyn Clock> = Box::new(SystemClock::new());
        let fixed_clock: Box<dyn Clock> = Box::new(FixedClock::from_epoch_millis(1705314600000));

        let _ = system_clock.now_epoch_millis();
        assert_eq!(fixed_clock.now_epoch_millis(), 1705314600000);
    }
}
