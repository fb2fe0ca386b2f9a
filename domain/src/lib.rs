//! Domain layer for spotlight
//!
//! This crate contains the rules of the show: the stage machine that gates
//! every operation, the score ledger, the conversation log and the roster of
//! contestants. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Stage Machine
//!
//! The game moves through a fixed sequence of [`Stage`]s. Every mutating
//! operation first calls [`StageMachine::require`], so calls made out of
//! order are rejected instead of corrupting state.
//!
//! ```text
//! host_intro → ai_intro → question_submission ⟲ (until all questions exist)
//!            → round_start → answer_submission → rating → next_round
//!                 ↑                                          │
//!                 └──────────── round ≤ max_rounds ──────────┤
//!                                                            ↓
//!                              winner_announcement → game_complete
//! ```
//!
//! ## Score Ledger
//!
//! Ratings accumulate per contestant. The winner is the contestant with the
//! highest mean; ties go to whoever comes first in roster order.

pub mod core;
pub mod game;
pub mod prompt;

// Re-export commonly used types
pub use core::error::GameError;
pub use game::{
    ledger::{RatingRecord, ScoreLedger},
    log::{ConversationLog, LogEntry},
    rating::{Rating, parse_rating},
    roster::{Contestant, ContestantKind, ParticipantId, Roster, RosterError},
    stage::{Progress, Stage, StageMachine},
};
pub use prompt::{Creativity, InstructionTemplate, SlotValues, TemplateError};
