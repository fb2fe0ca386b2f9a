//! Domain error types

use crate::game::stage::Stage;
use thiserror::Error;

/// Rule violations raised by the game domain.
///
/// Each variant is a distinct failure so the transport can map it to its own
/// response. None of them are recovered from inside the domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Operation requires stage '{expected}' but the game is in stage '{actual}'")]
    InvalidStage { expected: Stage, actual: Stage },

    #[error("'{participant}' is not the human contestant")]
    WrongParticipant { participant: String },

    #[error("'{participant}' already answered in round {round}")]
    AnswerAlreadySubmitted { participant: String, round: u32 },

    #[error("Invalid rating for '{participant}': {detail}")]
    InvalidRating { participant: String, detail: String },

    #[error("No numeric rating found in generated text: {0:?}")]
    UnparsableRating(String),

    #[error("'{0}' has no ratings")]
    NoRatings(String),

    #[error("Ratings missing for: {}", .0.join(", "))]
    IncompleteRatings(Vec<String>),

    #[error("No question stored for round {0}")]
    MissingQuestion(u32),

    #[error("The game is already complete")]
    GameComplete,
}

impl GameError {
    /// Short machine-readable identifier for this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::InvalidStage { .. } => "invalid_stage",
            GameError::WrongParticipant { .. } => "wrong_participant",
            GameError::AnswerAlreadySubmitted { .. } => "answer_already_submitted",
            GameError::InvalidRating { .. } => "invalid_rating",
            GameError::UnparsableRating(_) => "unparsable_rating",
            GameError::NoRatings(_) => "no_ratings",
            GameError::IncompleteRatings(_) => "incomplete_ratings",
            GameError::MissingQuestion(_) => "missing_question",
            GameError::GameComplete => "game_complete",
        }
    }
}
