use uuid::Uuid;

/// IdGenerator trait for abstracting device-id assignment.
///
/// A device that registers without supplying its own id gets a server-assigned
/// UUID v4, which it must present on every subsequent check-in.
pub trait IdGenerator: Send + Sync {
    /// Generate a new UUID v4 in hyphenated lowercase format.
    fn uuid_v4(&self) -> String;
}

/// Production implementation of IdGenerator using random UUID generation
#[derive(Debug, Clone, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn uuid_v4(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Test implementation of IdGenerator returning a fixed sequence of ids.
/// When the sequence is exhausted it wraps around to the beginning.
#[derive(Debug, Clone)]
pub struct FixedIdGenerator {
    ids: Vec<String>,
    index: std::sync::Arc<std::sync::Mutex<usize>>,
}

impl FixedIdGenerator {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            index: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    /// Create a FixedIdGenerator that always returns the same id
    pub fn single(id: impl Into<String>) -> Self {
        Self::new(vec![id.into()])
    }
}

impl IdGenerator for FixedIdGenerator {
    fn uuid_v4(&self) -> String {
        let mut index = self.index.lock().unwrap();
        let id = self.ids[*index % self.ids.len()].clone();
        *index += 1;
        id
    }
}
