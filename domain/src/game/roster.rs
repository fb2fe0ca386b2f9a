//! Contestants taking part in a game

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Personality used when an answer is generated on behalf of the human contestant
pub const HUMAN_STAND_IN_PERSONALITY: &str =
    "Easygoing and sincere, answering on the spot with a bit of nervous charm";

/// Errors raised while assembling a roster
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster needs exactly one human contestant, found none")]
    NoHuman,

    #[error("roster needs exactly one human contestant, found {0}")]
    MultipleHumans(usize),

    #[error("roster needs at least one AI contestant")]
    NoAi,

    #[error("duplicate contestant id: {0}")]
    DuplicateId(String),

    #[error("contestant id cannot be empty")]
    EmptyId,
}

/// Identifier of a contestant (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        ParticipantId::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        ParticipantId::new(s)
    }
}

/// Who controls a contestant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContestantKind {
    /// Answers come from the player (or are generated on their behalf)
    Human,
    /// Answers are generated in character
    Ai { personality: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: ParticipantId,
    pub kind: ContestantKind,
}

impl Contestant {
    pub fn human(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            kind: ContestantKind::Human,
        }
    }

    pub fn ai(id: impl Into<ParticipantId>, personality: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ContestantKind::Ai {
                personality: personality.into(),
            },
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self.kind, ContestantKind::Human)
    }

    /// Personality to answer with; the human gets a generic stand-in
    pub fn personality(&self) -> &str {
        match &self.kind {
            ContestantKind::Human => HUMAN_STAND_IN_PERSONALITY,
            ContestantKind::Ai { personality } => personality,
        }
    }
}

/// Ordered, validated set of contestants.
///
/// The order is the enumeration order used for tie-breaks and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    contestants: Vec<Contestant>,
    human_index: usize,
}

impl Roster {
    pub fn new(contestants: Vec<Contestant>) -> Result<Self, RosterError> {
        {
            let mut seen = std::collections::HashSet::new();
            for contestant in &contestants {
                if contestant.id.as_str().trim().is_empty() {
                    return Err(RosterError::EmptyId);
                }
                if !seen.insert(contestant.id.as_str()) {
                    return Err(RosterError::DuplicateId(contestant.id.to_string()));
                }
            }
        }

        let humans: Vec<usize> = contestants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_human())
            .map(|(i, _)| i)
            .collect();

        let human_index = match humans.as_slice() {
            [] => return Err(RosterError::NoHuman),
            [index] => *index,
            many => return Err(RosterError::MultipleHumans(many.len())),
        };

        if contestants.len() < 2 {
            return Err(RosterError::NoAi);
        }

        Ok(Self {
            contestants,
            human_index,
        })
    }

    pub fn human(&self) -> &Contestant {
        &self.contestants[self.human_index]
    }

    pub fn ai_contestants(&self) -> impl Iterator<Item = &Contestant> {
        self.contestants.iter().filter(|c| !c.is_human())
    }

    pub fn contestants(&self) -> &[Contestant] {
        &self.contestants
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.contestants.iter().map(|c| &c.id)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Contestant> {
        self.contestants.iter().find(|c| &c.id == id)
    }

    pub fn len(&self) -> usize {
        self.contestants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contestants.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            contestants: vec![
                Contestant::ai(
                    "contestant1",
                    "Confident and ambitious, with a dry sense of humor and a passion for adventure",
                ),
                Contestant::ai(
                    "contestant2",
                    "Shy and eager to please, with low self-esteem and a habit of backhanded compliments",
                ),
                Contestant::human("contestant3"),
            ],
            human_index: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = Roster::default();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.human().id.as_str(), "contestant3");
        assert_eq!(roster.ai_contestants().count(), 2);
    }

    #[test]
    fn test_default_roster_passes_validation() {
        let roster = Roster::default();
        let rebuilt = Roster::new(roster.contestants().to_vec()).unwrap();
        assert_eq!(rebuilt, roster);
    }

    #[test]
    fn test_roster_requires_a_human() {
        let err = Roster::new(vec![Contestant::ai("a", "x"), Contestant::ai("b", "y")]).unwrap_err();
        assert_eq!(err, RosterError::NoHuman);
    }

    #[test]
    fn test_roster_rejects_two_humans() {
        let err = Roster::new(vec![
            Contestant::human("a"),
            Contestant::human("b"),
            Contestant::ai("c", "z"),
        ])
        .unwrap_err();
        assert_eq!(err, RosterError::MultipleHumans(2));
    }

    #[test]
    fn test_roster_requires_an_ai() {
        let err = Roster::new(vec![Contestant::human("solo")]).unwrap_err();
        assert_eq!(err, RosterError::NoAi);
    }

    #[test]
    fn test_roster_rejects_duplicates_and_empty_ids() {
        let err = Roster::new(vec![Contestant::human("a"), Contestant::ai("a", "x")]).unwrap_err();
        assert_eq!(err, RosterError::DuplicateId("a".to_string()));

        let err = Roster::new(vec![Contestant::human(" "), Contestant::ai("a", "x")]).unwrap_err();
        assert_eq!(err, RosterError::EmptyId);
    }

    #[test]
    fn test_human_personality_is_stand_in() {
        let roster = Roster::default();
        assert_eq!(roster.human().personality(), HUMAN_STAND_IN_PERSONALITY);
        assert!(roster.get(&"contestant1".into()).unwrap().personality().contains("Confident"));
    }
}
