//! Configuration file loading for spotlight
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SPOTLIGHT_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./spotlight.toml` or `./.spotlight.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/spotlight/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileContestantConfig, FileCreativityConfig, FileGameConfig,
    FileLoggingConfig, FileProviderConfig, FileServerConfig, Severity,
};
pub use loader::ConfigLoader;
