//! Game settings: what a fresh session is built from.
//!
//! A [`GameSettings`] value is kept by the [`GameHost`](crate::GameHost) and
//! used again for every reset, so a reset always yields the same kind of game.

use spotlight_domain::{Creativity, Roster};

/// Creativity used for each kind of generation call.
///
/// Questions run hottest, ratings coolest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreativityProfile {
    /// Introductions and the winner announcement
    pub default: Creativity,
    /// Question generation
    pub question: Creativity,
    /// Contestant answers
    pub answer: Creativity,
    /// Rating answers
    pub rating: Creativity,
}

impl Default for CreativityProfile {
    fn default() -> Self {
        Self {
            default: Creativity::new(0.7),
            question: Creativity::new(0.9),
            answer: Creativity::new(0.8),
            rating: Creativity::new(0.6),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// Number of rounds, at least 1
    pub max_rounds: u32,
    pub roster: Roster,
    pub creativity: CreativityProfile,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            roster: Roster::default(),
            creativity: CreativityProfile::default(),
        }
    }
}

impl GameSettings {
    // ==================== Builder Methods ====================

    /// Set the number of rounds; values below 1 become 1
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_creativity(mut self, creativity: CreativityProfile) -> Self {
        self.creativity = creativity;
        self
    }
}
