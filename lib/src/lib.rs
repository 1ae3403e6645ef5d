pub mod autofill;
pub mod browser;
pub mod config;
pub mod error;
pub mod exchange;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod store;
pub mod sync;
pub mod tags;
pub mod utils;

// Re-export error types for convenience
pub use error::{Result, TagmarksError};
