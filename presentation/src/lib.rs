//! Presentation layer for spotlight
//!
//! This crate contains the CLI definitions, the HTTP transport, the
//! terminal game and its console output.

pub mod cli;
pub mod http;
pub mod output;
pub mod play;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use http::{SharedHost, router, serve};
pub use output::console::ConsoleFormatter;
pub use play::{PlayError, TerminalGame};
pub use progress::reporter::ProgressReporter;
