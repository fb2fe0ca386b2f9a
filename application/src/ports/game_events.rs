//! Port for structured game event logging.
//!
//! Defines the [`GameEventLogger`] trait for recording what happened in a
//! game (introductions, questions, answers, ratings, the winner) to a
//! structured transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full game
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured game event for logging.
pub struct GameEvent {
    /// Event type identifier (e.g., "question_generated", "answers_rated").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl GameEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging game events.
///
/// `log` is synchronous and non-fallible so a broken transcript never fails
/// a game operation.
pub trait GameEventLogger: Send + Sync {
    fn log(&self, event: GameEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoGameEventLogger;

impl GameEventLogger for NoGameEventLogger {
    fn log(&self, _event: GameEvent) {}
}
