//! Conversation log: append-only record of what was asked and answered

use super::roster::ParticipantId;
use serde::Serialize;

/// One answer given by one contestant in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub round: u32,
    pub participant: ParticipantId,
    pub question: String,
    pub answer: String,
}

impl LogEntry {
    /// Render the exchange as the bachelorette sees it when rating
    pub fn as_conversation(&self) -> String {
        format!(
            "Bachelorette: {}\n{}: {}",
            self.question, self.participant, self.answer
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    entries: Vec<LogEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        round: u32,
        participant: ParticipantId,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> &LogEntry {
        self.entries.push(LogEntry {
            round,
            participant,
            question: question.into(),
            answer: answer.into(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Entries of `round` in insertion order.
    ///
    /// The iterator is lazy and can be cloned to walk the round again.
    pub fn for_round(&self, round: u32) -> impl Iterator<Item = &LogEntry> + Clone + '_ {
        self.entries.iter().filter(move |e| e.round == round)
    }

    pub fn has_answer(&self, round: u32, participant: &ParticipantId) -> bool {
        self.for_round(round).any(|e| &e.participant == participant)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
