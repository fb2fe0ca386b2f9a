//! Stage machine for the show
//!
//! The [`StageMachine`] is the single authority on which operation may run.
//! Transitions come from one table ([`Stage::successor`]); two edges depend on
//! game data instead of being fixed:
//!
//! - `question_submission` holds until every round has its question.
//! - `next_round` loops back to `round_start` while rounds remain, otherwise
//!   it moves on to `winner_announcement`.

use crate::core::error::GameError;
use serde::{Deserialize, Serialize};

/// Phase of the show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The host opens the show
    HostIntro,
    /// The AI bachelorette introduces herself
    AiIntro,
    /// Questions for every round are generated up front
    QuestionSubmission,
    /// The question of the current round is revealed
    RoundStart,
    /// Contestants answer the current question
    AnswerSubmission,
    /// Every answer of the round is rated
    Rating,
    /// Move to the next round or to the finale
    NextRound,
    /// The winner is announced
    WinnerAnnouncement,
    /// Terminal stage
    GameComplete,
}

impl Stage {
    /// All stages in forward order
    pub const ALL: [Stage; 9] = [
        Stage::HostIntro,
        Stage::AiIntro,
        Stage::QuestionSubmission,
        Stage::RoundStart,
        Stage::AnswerSubmission,
        Stage::Rating,
        Stage::NextRound,
        Stage::WinnerAnnouncement,
        Stage::GameComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::HostIntro => "host_intro",
            Stage::AiIntro => "ai_intro",
            Stage::QuestionSubmission => "question_submission",
            Stage::RoundStart => "round_start",
            Stage::AnswerSubmission => "answer_submission",
            Stage::Rating => "rating",
            Stage::NextRound => "next_round",
            Stage::WinnerAnnouncement => "winner_announcement",
            Stage::GameComplete => "game_complete",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::HostIntro => "Host Introduction",
            Stage::AiIntro => "Bachelorette Introduction",
            Stage::QuestionSubmission => "Question Submission",
            Stage::RoundStart => "Round Start",
            Stage::AnswerSubmission => "Answer Submission",
            Stage::Rating => "Rating",
            Stage::NextRound => "Next Round",
            Stage::WinnerAnnouncement => "Winner Announcement",
            Stage::GameComplete => "Game Complete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::GameComplete)
    }

    /// Transition table.
    ///
    /// Returns `None` only for the terminal stage. For `next_round`, the
    /// round in `progress` must already be incremented.
    pub fn successor(&self, progress: &Progress) -> Option<Stage> {
        let next = match self {
            Stage::HostIntro => Stage::AiIntro,
            Stage::AiIntro => Stage::QuestionSubmission,
            Stage::QuestionSubmission => {
                if progress.questions >= progress.max_rounds as usize {
                    Stage::RoundStart
                } else {
                    Stage::QuestionSubmission
                }
            }
            Stage::RoundStart => Stage::AnswerSubmission,
            Stage::AnswerSubmission => Stage::Rating,
            Stage::Rating => Stage::NextRound,
            Stage::NextRound => {
                if progress.round > progress.max_rounds {
                    Stage::WinnerAnnouncement
                } else {
                    Stage::RoundStart
                }
            }
            Stage::WinnerAnnouncement => Stage::GameComplete,
            Stage::GameComplete => return None,
        };
        Some(next)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage: {}", s))
    }
}

/// Game data the transition table looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Number of questions generated so far
    pub questions: usize,
    /// Current round (1-based, `max_rounds + 1` once all rounds are played)
    pub round: u32,
    /// Number of rounds in this game
    pub max_rounds: u32,
}

/// Tracks the current stage and every stage visited so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMachine {
    current: Stage,
    history: Vec<Stage>,
}

impl StageMachine {
    pub fn new() -> Self {
        Self {
            current: Stage::HostIntro,
            history: vec![Stage::HostIntro],
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    /// Guard for every gated operation
    pub fn require(&self, stage: Stage) -> Result<(), GameError> {
        if self.current == stage {
            Ok(())
        } else {
            Err(GameError::InvalidStage {
                expected: stage,
                actual: self.current,
            })
        }
    }

    /// Follow the transition table from the current stage.
    ///
    /// Staying in `question_submission` is not recorded as a transition.
    pub fn advance(&mut self, progress: &Progress) -> Result<Stage, GameError> {
        let next = self
            .current
            .successor(progress)
            .ok_or(GameError::GameComplete)?;

        if next != self.current {
            self.current = next;
            self.history.push(next);
        }
        Ok(next)
    }

    /// Stages visited so far, starting with `host_intro`
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Number of transitions taken so far
    pub fn transitions(&self) -> usize {
        self.history.len() - 1
    }
}

impl Default for StageMachine {
    fn default() -> Self {
        Self::new()
    }
}
