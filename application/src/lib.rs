//! Application layer for spotlight
//!
//! This crate contains the game session use case, the handle that owns the
//! active session, and the ports the session talks to. It depends only on
//! the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CreativityProfile, GameSettings};
pub use ports::{
    game_events::{GameEvent, GameEventLogger, NoGameEventLogger},
    text_generation::{GenerationError, TextGenerationGateway},
};
pub use use_cases::game_host::GameHost;
pub use use_cases::game_session::{
    AnnounceWinnerOutput, GameSession, NextQuestionOutput, QuestionOutput, RoundAdvanceOutput,
    ContestantStatus, SessionError, SessionSnapshot, SubmitAnswerOutput,
};
