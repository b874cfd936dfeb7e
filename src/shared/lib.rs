// Declare modules at the root level
pub mod domain;
pub mod error;
pub mod fanout;
pub mod id_generator;
pub mod resolver;
pub mod store;
pub mod time;
pub mod validators;

// Test utilities module (available in test and integration test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export everything under a shared namespace for external access
pub mod shared {
    pub use super::domain;
    pub use super::error;
    pub use super::fanout;
    pub use super::id_generator;
    pub use super::resolver;
    pub use super::store;
    pub use super::time;
    pub use super::validators;
}

// Also re-export at root for convenience
pub use domain::*;
pub use error::*;
pub use fanout::*;
pub use id_generator::*;
pub use resolver::*;
pub use store::*;
pub use time::*;
pub use validators::*;
