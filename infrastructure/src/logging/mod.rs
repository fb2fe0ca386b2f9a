//! Logging infrastructure: the structured game transcript.
//!
//! Provides [`JsonlGameEventLogger`], a JSONL file writer that implements
//! the [`GameEventLogger`](spotlight_application::GameEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlGameEventLogger;
