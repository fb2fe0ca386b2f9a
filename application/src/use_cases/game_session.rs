//! Game session use case
//!
//! A [`GameSession`] owns everything one game needs: the stage machine, the
//! round counter, the generated questions, the conversation log and the score
//! ledger. Every public operation follows the same shape:
//!
//! 1. `require()` the stage the operation belongs to
//! 2. make every gateway call and validate every result
//! 3. mutate state and advance the stage machine
//!
//! Because step 3 only starts once step 2 fully succeeded, a failed
//! operation leaves the session exactly as it was.

use crate::config::GameSettings;
use crate::ports::game_events::{GameEvent, GameEventLogger, NoGameEventLogger};
use crate::ports::text_generation::{GenerationError, TextGenerationGateway};
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::json;
use spotlight_domain::prompt::show;
use spotlight_domain::{
    ConversationLog, Creativity, GameError, InstructionTemplate, LogEntry, ParticipantId, Progress,
    Roster, ScoreLedger, SlotValues, Stage, StageMachine, parse_rating,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by session operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Text generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl SessionError {
    /// Short machine-readable identifier for this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Game(e) => e.kind(),
            SessionError::Generation(_) => "generation_error",
        }
    }
}

/// Result of [`GameSession::generate_question`]
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOutput {
    pub question: String,
    pub questions_generated: usize,
    pub stage: Stage,
}

/// Result of [`GameSession::next_question`]
#[derive(Debug, Clone, PartialEq)]
pub struct NextQuestionOutput {
    pub round: u32,
    pub question: String,
}

/// Result of [`GameSession::submit_answer`]
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAnswerOutput {
    pub message: String,
    pub answer_text: String,
    pub was_auto_generated: bool,
}

/// Result of [`GameSession::advance_round`]
#[derive(Debug, Clone, PartialEq)]
pub struct RoundAdvanceOutput {
    pub current_round: u32,
    pub game_complete: bool,
    pub stage: Stage,
}

/// Result of [`GameSession::announce_winner`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnnounceWinnerOutput {
    pub text: String,
    pub winner: ParticipantId,
    /// Mean rating per contestant, in roster order
    pub final_ratings: Vec<(ParticipantId, f64)>,
}

/// Per-contestant line of a [`SessionSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestantStatus {
    pub id: ParticipantId,
    pub human: bool,
    pub ratings: usize,
    pub mean: Option<f64>,
}

/// Read-only view of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub game_number: u64,
    pub stage: Stage,
    pub round: u32,
    pub max_rounds: u32,
    pub questions: Vec<String>,
    pub answers: Vec<LogEntry>,
    pub contestants: Vec<ContestantStatus>,
}

/// One game, from host introduction to the winner announcement
pub struct GameSession<G: TextGenerationGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    events: Arc<dyn GameEventLogger>,
    settings: GameSettings,
    game_number: u64,
    machine: StageMachine,
    round: u32,
    questions: Vec<String>,
    log: ConversationLog,
    ledger: ScoreLedger,
}

impl<G: TextGenerationGateway + ?Sized + 'static> GameSession<G> {
    /// Start a game at the host introduction.
    ///
    /// `max_rounds` below 1 is raised to 1, however the settings were built.
    pub fn new(gateway: Arc<G>, settings: GameSettings) -> Self {
        let max_rounds = settings.max_rounds;
        let settings = settings.with_max_rounds(max_rounds);
        let ledger = ScoreLedger::new(settings.roster.ids().cloned());
        Self {
            gateway,
            events: Arc::new(NoGameEventLogger),
            settings,
            game_number: 1,
            machine: StageMachine::new(),
            round: 1,
            questions: Vec::new(),
            log: ConversationLog::new(),
            ledger,
        }
    }

    pub fn with_event_logger(mut self, events: Arc<dyn GameEventLogger>) -> Self {
        self.events = events;
        self
    }

    pub fn with_game_number(mut self, game_number: u64) -> Self {
        self.game_number = game_number;
        self
    }

    // ==================== Accessors ====================

    pub fn stage(&self) -> Stage {
        self.machine.current()
    }

    pub fn stage_history(&self) -> &[Stage] {
        self.machine.history()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.settings.max_rounds
    }

    pub fn game_number(&self) -> u64 {
        self.game_number
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn roster(&self) -> &Roster {
        &self.settings.roster
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let contestants = self
            .settings
            .roster
            .contestants()
            .iter()
            .map(|c| ContestantStatus {
                id: c.id.clone(),
                human: c.is_human(),
                ratings: self.ledger.ratings(&c.id).map_or(0, |r| r.len()),
                mean: self.ledger.mean(&c.id).ok(),
            })
            .collect();

        SessionSnapshot {
            game_number: self.game_number,
            stage: self.stage(),
            round: self.round,
            max_rounds: self.settings.max_rounds,
            questions: self.questions.clone(),
            answers: self.log.entries().to_vec(),
            contestants,
        }
    }

    /// Question of the current round
    pub fn current_question(&self) -> Result<&str, GameError> {
        self.round
            .checked_sub(1)
            .and_then(|index| self.questions.get(index as usize))
            .map(String::as_str)
            .ok_or(GameError::MissingQuestion(self.round))
    }

    // ==================== Operations ====================

    pub async fn host_introduction(&mut self) -> Result<String, SessionError> {
        self.machine.require(Stage::HostIntro)?;

        let slots = SlotValues::new()
            .with("contestant_count", self.settings.roster.len().to_string())
            .with("round_count", self.settings.max_rounds.to_string());
        let text = self
            .generate(&show::HOST_INTRO, &slots, self.settings.creativity.default)
            .await?;

        self.advance()?;
        self.emit("host_introduction", json!({ "text": text }));
        Ok(text)
    }

    pub async fn ai_introduction(&mut self) -> Result<String, SessionError> {
        self.machine.require(Stage::AiIntro)?;

        let text = self
            .generate(&show::AI_INTRO, &SlotValues::new(), self.settings.creativity.default)
            .await?;

        self.advance()?;
        self.emit("ai_introduction", json!({ "text": text }));
        Ok(text)
    }

    /// Generate one question. The stage only moves on once every round has one.
    pub async fn generate_question(&mut self) -> Result<QuestionOutput, SessionError> {
        self.machine.require(Stage::QuestionSubmission)?;

        let previous = if self.questions.is_empty() {
            "(none yet)".to_string()
        } else {
            self.questions
                .iter()
                .map(|q| format!("- {}", q))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let slots = SlotValues::new()
            .with("question_number", (self.questions.len() + 1).to_string())
            .with("round_count", self.settings.max_rounds.to_string())
            .with("previous_questions", previous);
        let raw = self
            .generate(&show::QUESTION, &slots, self.settings.creativity.question)
            .await?;
        let question = clean_question(&raw);
        if question.is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }

        self.questions.push(question.clone());
        let stage = self.advance()?;
        info!(
            "Question {}/{} generated",
            self.questions.len(),
            self.settings.max_rounds
        );
        self.emit(
            "question_generated",
            json!({ "number": self.questions.len(), "question": question }),
        );

        Ok(QuestionOutput {
            question,
            questions_generated: self.questions.len(),
            stage,
        })
    }

    /// Reveal the question of the current round
    pub fn next_question(&mut self) -> Result<NextQuestionOutput, SessionError> {
        self.machine.require(Stage::RoundStart)?;

        let question = self.current_question()?.to_string();

        self.advance()?;
        info!("Round {} started", self.round);
        self.emit(
            "round_started",
            json!({ "round": self.round, "question": question }),
        );
        Ok(NextQuestionOutput {
            round: self.round,
            question,
        })
    }

    /// Record the human contestant's answer, generating one if none is given.
    ///
    /// Does not advance: AI answers are collected separately.
    pub async fn submit_answer(
        &mut self,
        participant: &ParticipantId,
        answer_text: Option<&str>,
    ) -> Result<SubmitAnswerOutput, SessionError> {
        self.machine.require(Stage::AnswerSubmission)?;

        let contestant = self
            .settings
            .roster
            .get(participant)
            .filter(|c| c.is_human())
            .ok_or_else(|| GameError::WrongParticipant {
                participant: participant.to_string(),
            })?;
        if self.log.has_answer(self.round, participant) {
            return Err(GameError::AnswerAlreadySubmitted {
                participant: participant.to_string(),
                round: self.round,
            }
            .into());
        }
        let question = self.current_question()?.to_string();

        let provided = answer_text.map(str::trim).filter(|text| !text.is_empty());
        let (answer, was_auto_generated) = match provided {
            Some(text) => (text.to_string(), false),
            None => {
                debug!("No answer given for {}, generating one", participant);
                let slots = SlotValues::new()
                    .with("question", question.as_str())
                    .with("personality", contestant.personality());
                let text = self
                    .generate(&show::CONTESTANT_ANSWER, &slots, self.settings.creativity.answer)
                    .await?;
                (text, true)
            }
        };

        self.log
            .append(self.round, participant.clone(), question, answer.as_str());
        info!("Answer from {} recorded for round {}", participant, self.round);
        self.emit(
            "answer_submitted",
            json!({
                "round": self.round,
                "participant": participant,
                "answer": answer,
                "autoGenerated": was_auto_generated,
            }),
        );

        Ok(SubmitAnswerOutput {
            message: format!("Answer recorded for {}", participant),
            answer_text: answer,
            was_auto_generated,
        })
    }

    /// Generate an answer for every AI contestant, then move on to rating
    pub async fn collect_ai_answers(&mut self) -> Result<Vec<(ParticipantId, String)>, SessionError> {
        self.machine.require(Stage::AnswerSubmission)?;

        let question = self.current_question()?.to_string();
        let answers = {
            let this = &*self;
            let creativity = this.settings.creativity.answer;
            try_join_all(this.settings.roster.ai_contestants().map(|contestant| {
                let slots = SlotValues::new()
                    .with("question", question.as_str())
                    .with("personality", contestant.personality());
                async move {
                    this.generate(&show::CONTESTANT_ANSWER, &slots, creativity)
                        .await
                        .map(|text| (contestant.id.clone(), text))
                }
            }))
            .await?
        };

        for (participant, answer) in &answers {
            self.log.append(
                self.round,
                participant.clone(),
                question.as_str(),
                answer.as_str(),
            );
        }
        self.advance()?;
        info!(
            "Collected {} AI answers for round {}",
            answers.len(),
            self.round
        );
        self.emit(
            "ai_answers_collected",
            json!({
                "round": self.round,
                "answers": answers
                    .iter()
                    .map(|(p, a)| json!({ "participant": p, "answer": a }))
                    .collect::<Vec<_>>(),
            }),
        );

        Ok(answers)
    }

    /// Rate every answer of the current round
    pub async fn rate_all_answers(&mut self) -> Result<Vec<(ParticipantId, f64)>, SessionError> {
        self.machine.require(Stage::Rating)?;

        let round = self.round;
        let entries: Vec<LogEntry> = self.log.for_round(round).cloned().collect();
        let ratings = {
            let this = &*self;
            let creativity = this.settings.creativity.rating;
            try_join_all(entries.iter().map(|entry| {
                let slots = SlotValues::new()
                    .with("round_number", round.to_string())
                    .with("conversation", entry.as_conversation());
                async move {
                    let text = this.generate(&show::RATING, &slots, creativity).await?;
                    let value = parse_rating(&text)?;
                    Ok::<_, SessionError>((entry.participant.clone(), value))
                }
            }))
            .await?
        };

        // Record into a copy so a rejected rating leaves the ledger untouched
        let mut ledger = self.ledger.clone();
        for (participant, value) in &ratings {
            ledger.record(participant, round, *value)?;
        }
        self.ledger = ledger;

        self.advance()?;
        info!("Rated {} answers for round {}", ratings.len(), round);
        self.emit(
            "answers_rated",
            json!({
                "round": round,
                "ratings": ratings
                    .iter()
                    .map(|(p, r)| json!({ "participant": p, "rating": r }))
                    .collect::<Vec<_>>(),
            }),
        );

        Ok(ratings)
    }

    /// Move to the next round, or to the winner announcement after the last one
    pub fn advance_round(&mut self) -> Result<RoundAdvanceOutput, SessionError> {
        self.machine.require(Stage::NextRound)?;

        self.round += 1;
        let stage = self.advance()?;
        let game_complete = self.round > self.settings.max_rounds;

        info!(
            "Advanced to round {} (rounds finished: {})",
            self.round, game_complete
        );
        self.emit(
            "round_advanced",
            json!({ "round": self.round, "gameComplete": game_complete }),
        );

        Ok(RoundAdvanceOutput {
            current_round: self.round,
            game_complete,
            stage,
        })
    }

    pub async fn announce_winner(&mut self) -> Result<AnnounceWinnerOutput, SessionError> {
        self.machine.require(Stage::WinnerAnnouncement)?;

        let missing = self.ledger.missing();
        if !missing.is_empty() {
            return Err(GameError::IncompleteRatings(
                missing.iter().map(ToString::to_string).collect(),
            )
            .into());
        }
        let (winner, _) = self.ledger.winner()?;
        let final_ratings = self.ledger.means()?;

        let standings = final_ratings
            .iter()
            .map(|(p, mean)| format!("- {}: {:.2}", p, mean))
            .collect::<Vec<_>>()
            .join("\n");
        let slots = SlotValues::new()
            .with("standings", standings)
            .with("winner", winner.as_str());
        let text = self
            .generate(
                &show::WINNER_ANNOUNCEMENT,
                &slots,
                self.settings.creativity.default,
            )
            .await?;

        self.advance()?;
        info!("Winner announced: {}", winner);
        self.emit(
            "winner_announced",
            json!({
                "winner": winner,
                "text": text,
                "finalRatings": final_ratings
                    .iter()
                    .map(|(p, mean)| json!({ "participant": p, "mean": mean }))
                    .collect::<Vec<_>>(),
            }),
        );

        Ok(AnnounceWinnerOutput {
            text,
            winner,
            final_ratings,
        })
    }

    // ==================== Helpers ====================

    fn progress(&self) -> Progress {
        Progress {
            questions: self.questions.len(),
            round: self.round,
            max_rounds: self.settings.max_rounds,
        }
    }

    fn advance(&mut self) -> Result<Stage, GameError> {
        let from = self.machine.current();
        let progress = self.progress();
        let to = self.machine.advance(&progress)?;
        if from != to {
            debug!("Stage {} -> {}", from, to);
            self.emit(
                "stage_changed",
                json!({ "from": from, "to": to, "round": self.round }),
            );
        }
        Ok(to)
    }

    async fn generate(
        &self,
        template: &InstructionTemplate,
        slots: &SlotValues,
        creativity: Creativity,
    ) -> Result<String, SessionError> {
        debug!(
            "Generating '{}' at creativity {:.2}",
            template.name(),
            creativity.value()
        );
        let text = self.gateway.generate(template, slots, creativity).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }
        Ok(text.to_string())
    }

    fn emit(&self, event_type: &'static str, mut payload: serde_json::Value) {
        if let serde_json::Value::Object(map) = &mut payload {
            map.insert("game".to_string(), json!(self.game_number));
        }
        self.events.log(GameEvent::new(event_type, payload));
    }
}

/// Trim whitespace and surrounding quotes from a generated question
fn clean_question(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use spotlight_domain::{Contestant, Roster};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockGateway {
        calls: Mutex<Vec<(&'static str, f32)>>,
        ratings: Mutex<HashMap<String, String>>,
        overrides: Mutex<HashMap<&'static str, String>>,
        failing: Mutex<Option<&'static str>>,
    }

    impl MockGateway {
        fn with_rating(self, participant: &str, text: &str) -> Self {
            self.ratings
                .lock()
                .unwrap()
                .insert(participant.to_string(), text.to_string());
            self
        }

        fn respond(&self, template: &'static str, text: &str) {
            self.overrides
                .lock()
                .unwrap()
                .insert(template, text.to_string());
        }

        fn fail_on(&self, template: &'static str) {
            *self.failing.lock().unwrap() = Some(template);
        }

        fn calls_for(&self, template: &str) -> Vec<f32> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(name, _)| *name == template)
                .map(|(_, creativity)| *creativity)
                .collect()
        }
    }

    #[async_trait]
    impl TextGenerationGateway for MockGateway {
        async fn generate(
            &self,
            template: &InstructionTemplate,
            slots: &SlotValues,
            creativity: Creativity,
        ) -> Result<String, GenerationError> {
            // Surface slot mistakes the same way a real adapter would
            template.render(slots)?;

            let name = template.name();
            self.calls.lock().unwrap().push((name, creativity.value()));

            if *self.failing.lock().unwrap() == Some(name) {
                return Err(GenerationError::ConnectionError("mock outage".to_string()));
            }
            if let Some(text) = self.overrides.lock().unwrap().get(name) {
                return Ok(text.clone());
            }

            let text = match name {
                "question" => format!(
                    "\"Question {}?\"",
                    slots.get("question_number").unwrap_or("?")
                ),
                "contestant_answer" => format!("Answer from {}", slots.get("personality").unwrap_or("")),
                "rating" => {
                    let conversation = slots.get("conversation").unwrap_or("");
                    self.ratings
                        .lock()
                        .unwrap()
                        .iter()
                        .find(|(p, _)| conversation.contains(&format!("\n{}: ", p)))
                        .map(|(_, text)| text.clone())
                        .unwrap_or_else(|| "7".to_string())
                }
                other => format!("{} text", other),
            };
            Ok(text)
        }
    }

    fn session(gateway: MockGateway) -> (Arc<MockGateway>, GameSession<MockGateway>) {
        let gateway = Arc::new(gateway);
        let session = GameSession::new(Arc::clone(&gateway), GameSettings::default());
        (gateway, session)
    }

    fn human() -> ParticipantId {
        ParticipantId::new("contestant3")
    }

    /// Play up to (and including) question generation
    async fn through_questions(session: &mut GameSession<MockGateway>) {
        session.host_introduction().await.unwrap();
        session.ai_introduction().await.unwrap();
        for _ in 0..session.max_rounds() {
            session.generate_question().await.unwrap();
        }
    }

    /// Play one full round
    async fn play_round(session: &mut GameSession<MockGateway>, answer: Option<&str>) {
        session.next_question().unwrap();
        session.submit_answer(&human(), answer).await.unwrap();
        session.collect_ai_answers().await.unwrap();
        session.rate_all_answers().await.unwrap();
        session.advance_round().unwrap();
    }

    // ==================== End-to-end ====================

    #[tokio::test]
    async fn test_full_game() {
        let gateway = MockGateway::default()
            .with_rating("contestant1", "6")
            .with_rating("contestant2", "Hmm... 8.5 out of 10")
            .with_rating("contestant3", "9");
        let (_, mut session) = session(gateway);

        through_questions(&mut session).await;
        assert_eq!(session.stage(), Stage::RoundStart);

        for round in 1..=3 {
            assert_eq!(session.round(), round);
            play_round(&mut session, Some("x")).await;
        }
        assert_eq!(session.stage(), Stage::WinnerAnnouncement);
        assert_eq!(session.round(), 4);

        let result = session.announce_winner().await.unwrap();
        assert_eq!(result.winner, human());
        assert_eq!(result.text, "winner_announcement text");
        assert_eq!(result.final_ratings.len(), 3);
        for (participant, _) in &result.final_ratings {
            assert_eq!(session.ledger().ratings(participant).unwrap().len(), 3);
        }
        assert_eq!(result.final_ratings[1], (ParticipantId::new("contestant2"), 8.5));
        assert_eq!(session.stage(), Stage::GameComplete);
        assert_eq!(session.stage_history().len() - 1, 8 + 4 * 2);
    }

    #[tokio::test]
    async fn test_equal_means_go_to_first_contestant() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        for _ in 0..3 {
            play_round(&mut session, Some("x")).await;
        }
        let result = session.announce_winner().await.unwrap();
        assert_eq!(result.winner, ParticipantId::new("contestant1"));
    }

    // ==================== Stage gating ====================

    #[tokio::test]
    async fn test_gated_operations_fail_outside_their_stage() {
        let (_, mut session) = session(MockGateway::default());
        let before = session.snapshot();

        let errors = vec![
            session.ai_introduction().await.unwrap_err(),
            session.generate_question().await.unwrap_err(),
            session.next_question().unwrap_err(),
            session.submit_answer(&human(), Some("hi")).await.unwrap_err(),
            session.collect_ai_answers().await.unwrap_err(),
            session.rate_all_answers().await.unwrap_err(),
            session.advance_round().unwrap_err(),
            session.announce_winner().await.unwrap_err(),
        ];

        for error in errors {
            assert!(
                matches!(
                    error,
                    SessionError::Game(GameError::InvalidStage {
                        actual: Stage::HostIntro,
                        ..
                    })
                ),
                "unexpected error: {error:?}"
            );
        }
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn test_gated_operations_leave_recorded_play_untouched() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        play_round(&mut session, Some("x")).await;
        session.next_question().unwrap();
        session.submit_answer(&human(), Some("y")).await.unwrap();
        session.collect_ai_answers().await.unwrap();
        assert_eq!(session.stage(), Stage::Rating);
        assert_eq!(session.round(), 2);

        let before = session.snapshot();
        assert_eq!(before.answers.len(), 6);
        assert!(before.contestants.iter().all(|c| c.ratings == 1));

        let errors = vec![
            session.next_question().unwrap_err(),
            session.advance_round().unwrap_err(),
            session.collect_ai_answers().await.unwrap_err(),
            session.submit_answer(&human(), Some("again")).await.unwrap_err(),
            session.announce_winner().await.unwrap_err(),
        ];
        for error in errors {
            assert!(
                matches!(
                    error,
                    SessionError::Game(GameError::InvalidStage {
                        actual: Stage::Rating,
                        ..
                    })
                ),
                "unexpected error: {error:?}"
            );
        }
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn test_zero_rounds_from_struct_literal_is_raised_to_one() {
        let settings = GameSettings {
            max_rounds: 0,
            ..GameSettings::default()
        };
        let mut session = GameSession::new(Arc::new(MockGateway::default()), settings);
        assert_eq!(session.max_rounds(), 1);

        session.host_introduction().await.unwrap();
        session.ai_introduction().await.unwrap();
        let output = session.generate_question().await.unwrap();
        assert_eq!(output.stage, Stage::RoundStart);
        assert_eq!(session.questions().len(), 1);
    }

    #[tokio::test]
    async fn test_operations_rejected_after_game_complete() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        for _ in 0..3 {
            play_round(&mut session, None).await;
        }
        session.announce_winner().await.unwrap();

        let before = session.snapshot();
        assert!(session.host_introduction().await.is_err());
        assert!(session.announce_winner().await.is_err());
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn test_question_stage_absorbs_max_rounds_calls() {
        let (_, mut session) = session(MockGateway::default());
        session.host_introduction().await.unwrap();
        session.ai_introduction().await.unwrap();

        let first = session.generate_question().await.unwrap();
        assert_eq!(first.stage, Stage::QuestionSubmission);
        let second = session.generate_question().await.unwrap();
        assert_eq!(second.stage, Stage::QuestionSubmission);
        let third = session.generate_question().await.unwrap();
        assert_eq!(third.stage, Stage::RoundStart);
        assert_eq!(third.questions_generated, 3);

        // Quotes around generated questions are stripped
        assert_eq!(session.questions()[0], "Question 1?");
        assert!(session.generate_question().await.is_err());
        assert_eq!(session.questions().len(), 3);
    }

    #[tokio::test]
    async fn test_next_question_returns_question_of_current_round() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        play_round(&mut session, None).await;

        let output = session.next_question().unwrap();
        assert_eq!(output.round, 2);
        assert_eq!(output.question, "Question 2?");
    }

    // ==================== Answers ====================

    #[tokio::test]
    async fn test_submit_answer_rejects_ai_and_unknown_participants() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        session.next_question().unwrap();

        for id in ["contestant1", "nobody"] {
            let err = session
                .submit_answer(&ParticipantId::new(id), Some("hello"))
                .await
                .unwrap_err();
            assert_eq!(
                err,
                SessionError::Game(GameError::WrongParticipant {
                    participant: id.to_string()
                })
            );
        }
        assert!(session.log().is_empty());
    }

    #[tokio::test]
    async fn test_submit_answer_keeps_text_and_stage() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        session.next_question().unwrap();

        let output = session
            .submit_answer(&human(), Some("  Tacos, always.  "))
            .await
            .unwrap();
        assert_eq!(output.answer_text, "Tacos, always.");
        assert!(!output.was_auto_generated);
        assert_eq!(session.stage(), Stage::AnswerSubmission);
        assert_eq!(session.log().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_answer_generates_missing_or_blank_text() {
        let (gateway, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        session.next_question().unwrap();

        let output = session.submit_answer(&human(), Some("   ")).await.unwrap();
        assert!(output.was_auto_generated);
        assert!(output.answer_text.starts_with("Answer from Easygoing"));
        assert_eq!(gateway.calls_for("contestant_answer"), vec![0.8]);
    }

    #[tokio::test]
    async fn test_submit_answer_twice_in_a_round_fails() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        session.next_question().unwrap();
        session.submit_answer(&human(), Some("first")).await.unwrap();

        let err = session
            .submit_answer(&human(), Some("second"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Game(GameError::AnswerAlreadySubmitted {
                participant: "contestant3".to_string(),
                round: 1
            })
        );
        assert_eq!(session.log().len(), 1);
    }

    #[tokio::test]
    async fn test_collect_ai_answers_logs_every_ai_contestant() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        session.next_question().unwrap();

        let answers = session.collect_ai_answers().await.unwrap();
        let ids: Vec<&str> = answers.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(ids, vec!["contestant1", "contestant2"]);
        assert_eq!(session.log().for_round(1).count(), 2);
        assert_eq!(session.stage(), Stage::Rating);
    }

    // ==================== Failure atomicity ====================

    #[tokio::test]
    async fn test_gateway_failure_leaves_no_partial_answers() {
        let (gateway, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        session.next_question().unwrap();
        session.submit_answer(&human(), Some("x")).await.unwrap();
        let before = session.snapshot();

        gateway.fail_on("contestant_answer");
        let err = session.collect_ai_answers().await.unwrap_err();
        assert!(matches!(err, SessionError::Generation(GenerationError::ConnectionError(_))));
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn test_unparsable_rating_leaves_ledger_untouched() {
        let gateway = MockGateway::default().with_rating("contestant2", "Simply divine");
        let (_, mut session) = session(gateway);
        through_questions(&mut session).await;
        session.next_question().unwrap();
        session.submit_answer(&human(), Some("x")).await.unwrap();
        session.collect_ai_answers().await.unwrap();

        let err = session.rate_all_answers().await.unwrap_err();
        assert_eq!(
            err,
            SessionError::Game(GameError::UnparsableRating("Simply divine".to_string()))
        );
        assert_eq!(session.ledger().total_ratings(), 0);
        assert_eq!(session.stage(), Stage::Rating);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_not_clamped() {
        let gateway = MockGateway::default().with_rating("contestant3", "11");
        let (_, mut session) = session(gateway);
        through_questions(&mut session).await;
        session.next_question().unwrap();
        session.submit_answer(&human(), Some("x")).await.unwrap();
        session.collect_ai_answers().await.unwrap();

        let err = session.rate_all_answers().await.unwrap_err();
        assert!(matches!(err, SessionError::Game(GameError::InvalidRating { .. })));
        assert_eq!(session.ledger().total_ratings(), 0);
    }

    #[tokio::test]
    async fn test_empty_generation_is_an_error() {
        let (gateway, mut session) = session(MockGateway::default());
        gateway.respond("host_intro", "   ");

        let err = session.host_introduction().await.unwrap_err();
        assert_eq!(err, SessionError::Generation(GenerationError::EmptyResponse));
        assert_eq!(session.stage(), Stage::HostIntro);
    }

    // ==================== Winner ====================

    #[tokio::test]
    async fn test_announce_winner_requires_ratings_for_everyone() {
        let (_, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        // The human never answers, so they never get rated
        for _ in 0..3 {
            session.next_question().unwrap();
            session.collect_ai_answers().await.unwrap();
            session.rate_all_answers().await.unwrap();
            session.advance_round().unwrap();
        }

        let err = session.announce_winner().await.unwrap_err();
        assert_eq!(
            err,
            SessionError::Game(GameError::IncompleteRatings(vec!["contestant3".to_string()]))
        );
        assert_eq!(session.stage(), Stage::WinnerAnnouncement);
    }

    #[tokio::test]
    async fn test_advance_round_reports_completion() {
        let settings = GameSettings::default().with_max_rounds(1).with_roster(
            Roster::new(vec![Contestant::ai("bot", "calm"), Contestant::human("me")]).unwrap(),
        );
        let mut session = GameSession::new(Arc::new(MockGateway::default()), settings);
        session.host_introduction().await.unwrap();
        session.ai_introduction().await.unwrap();
        session.generate_question().await.unwrap();
        session.next_question().unwrap();
        session
            .submit_answer(&ParticipantId::new("me"), Some("x"))
            .await
            .unwrap();
        session.collect_ai_answers().await.unwrap();
        session.rate_all_answers().await.unwrap();

        let output = session.advance_round().unwrap();
        assert_eq!(output.current_round, 2);
        assert!(output.game_complete);
        assert_eq!(output.stage, Stage::WinnerAnnouncement);
    }

    // ==================== Creativity ====================

    #[tokio::test]
    async fn test_creativity_per_call_kind() {
        let (gateway, mut session) = session(MockGateway::default());
        through_questions(&mut session).await;
        play_round(&mut session, Some("x")).await;

        assert_eq!(gateway.calls_for("host_intro"), vec![0.7]);
        assert_eq!(gateway.calls_for("question"), vec![0.9, 0.9, 0.9]);
        assert_eq!(gateway.calls_for("contestant_answer"), vec![0.8, 0.8]);
        assert_eq!(gateway.calls_for("rating"), vec![0.6, 0.6, 0.6]);
    }
}
