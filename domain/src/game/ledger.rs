//! Score ledger
//!
//! Holds every rating a contestant received, in the order they were
//! recorded. Ratings are never removed. Means are plain arithmetic means and
//! an empty sequence is an error, never a zero.
//!
//! # Tie-break
//!
//! [`ScoreLedger::winner`] walks contestants in roster order and only replaces
//! the leader on a strictly higher mean, so equal means go to whoever comes
//! first in the roster.

use super::rating::Rating;
use super::roster::ParticipantId;
use crate::core::error::GameError;
use serde::Serialize;

/// A rating together with the round it was given in
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingRecord {
    pub round: u32,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreLedger {
    entries: Vec<(ParticipantId, Vec<RatingRecord>)>,
}

impl ScoreLedger {
    /// Create a ledger for a fixed, ordered set of participants
    pub fn new(participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            entries: participants.into_iter().map(|p| (p, Vec::new())).collect(),
        }
    }

    fn slot(&self, participant: &ParticipantId) -> Option<&Vec<RatingRecord>> {
        self.entries
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, ratings)| ratings)
    }

    /// Append a rating for `participant` given in `round`
    pub fn record(
        &mut self,
        participant: &ParticipantId,
        round: u32,
        value: f64,
    ) -> Result<Rating, GameError> {
        let rating = Rating::new(participant.as_str(), value)?;
        let ratings = self
            .entries
            .iter_mut()
            .find(|(p, _)| p == participant)
            .map(|(_, ratings)| ratings)
            .ok_or_else(|| GameError::InvalidRating {
                participant: participant.to_string(),
                detail: "unknown participant".to_string(),
            })?;
        ratings.push(RatingRecord { round, rating });
        Ok(rating)
    }

    /// All ratings of `participant`, or `None` if they are not in the ledger
    pub fn ratings(&self, participant: &ParticipantId) -> Option<&[RatingRecord]> {
        self.slot(participant).map(Vec::as_slice)
    }

    pub fn mean(&self, participant: &ParticipantId) -> Result<f64, GameError> {
        let ratings = self
            .slot(participant)
            .ok_or_else(|| GameError::InvalidRating {
                participant: participant.to_string(),
                detail: "unknown participant".to_string(),
            })?;
        if ratings.is_empty() {
            return Err(GameError::NoRatings(participant.to_string()));
        }
        let sum: f64 = ratings.iter().map(|r| r.rating.value()).sum();
        Ok(sum / ratings.len() as f64)
    }

    /// Mean of every participant, in roster order
    pub fn means(&self) -> Result<Vec<(ParticipantId, f64)>, GameError> {
        self.entries
            .iter()
            .map(|(p, _)| self.mean(p).map(|mean| (p.clone(), mean)))
            .collect()
    }

    /// Participants that have not been rated yet, in roster order
    pub fn missing(&self) -> Vec<ParticipantId> {
        self.entries
            .iter()
            .filter(|(_, ratings)| ratings.is_empty())
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|(_, ratings)| !ratings.is_empty())
    }

    /// Participant with the highest mean; ties go to the first in roster order
    pub fn winner(&self) -> Result<(ParticipantId, f64), GameError> {
        let mut best: Option<(ParticipantId, f64)> = None;
        for (participant, mean) in self.means()? {
            match &best {
                Some((_, best_mean)) if mean <= *best_mean => {}
                _ => best = Some((participant, mean)),
            }
        }
        best.ok_or_else(|| GameError::NoRatings("ledger has no participants".to_string()))
    }

    /// Number of ratings per participant, in roster order
    pub fn counts(&self) -> Vec<(ParticipantId, usize)> {
        self.entries
            .iter()
            .map(|(p, ratings)| (p.clone(), ratings.len()))
            .collect()
    }

    pub fn total_ratings(&self) -> usize {
        self.entries.iter().map(|(_, ratings)| ratings.len()).sum()
    }
}
