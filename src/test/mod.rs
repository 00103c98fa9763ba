// Test helpers, compiled only for unit tests
pub mod utils;
