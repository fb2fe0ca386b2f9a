//! Infrastructure layer for spotlight
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileLoggingConfig, FileProviderConfig,
    FileServerConfig, Severity,
};
pub use gateway::{ChatCompletionsGateway, RetryPolicy};
pub use logging::JsonlGameEventLogger;
