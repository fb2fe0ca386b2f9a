//! Route handlers, one per game operation

use super::SharedHost;
use super::error::ApiError;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use spotlight_application::SessionSnapshot;
use spotlight_domain::ParticipantId;

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub participant: String,
    #[serde(default)]
    pub answer_text: Option<String>,
}

fn participant_map<T: Into<Value> + Clone>(entries: &[(ParticipantId, T)]) -> Value {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(participant, value)| (participant.to_string(), value.clone().into()))
        .collect();
    Value::Object(map)
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Spotlight dating show is running",
    }))
}

pub async fn state(State(host): State<SharedHost>) -> Json<SessionSnapshot> {
    Json(host.snapshot().await)
}

pub async fn host_introduction(State(host): State<SharedHost>) -> ApiResult {
    let text = host.session().await.host_introduction().await?;
    Ok(Json(json!({ "text": text })))
}

pub async fn ai_introduction(State(host): State<SharedHost>) -> ApiResult {
    let text = host.session().await.ai_introduction().await?;
    Ok(Json(json!({ "text": text })))
}

pub async fn generate_question(State(host): State<SharedHost>) -> ApiResult {
    let output = host.session().await.generate_question().await?;
    Ok(Json(json!({
        "question": output.question,
        "questionsGenerated": output.questions_generated,
        "stage": output.stage,
    })))
}

pub async fn next_question(State(host): State<SharedHost>) -> ApiResult {
    let output = host.session().await.next_question()?;
    Ok(Json(json!({
        "round": output.round,
        "question": output.question,
    })))
}

pub async fn submit_answer(
    State(host): State<SharedHost>,
    request: Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = request?;
    let participant = ParticipantId::new(request.participant);
    let output = host
        .session()
        .await
        .submit_answer(&participant, request.answer_text.as_deref())
        .await?;
    Ok(Json(json!({
        "message": output.message,
        "answerText": output.answer_text,
        "wasAutoGenerated": output.was_auto_generated,
    })))
}

pub async fn collect_ai_answers(State(host): State<SharedHost>) -> ApiResult {
    let answers = host.session().await.collect_ai_answers().await?;
    Ok(Json(participant_map(&answers)))
}

pub async fn rate_answers(State(host): State<SharedHost>) -> ApiResult {
    let ratings = host.session().await.rate_all_answers().await?;
    Ok(Json(participant_map(&ratings)))
}

pub async fn next_round(State(host): State<SharedHost>) -> ApiResult {
    let output = host.session().await.advance_round()?;
    Ok(Json(json!({
        "currentRound": output.current_round,
        "gameComplete": output.game_complete,
    })))
}

pub async fn announce_winner(State(host): State<SharedHost>) -> ApiResult {
    let output = host.session().await.announce_winner().await?;
    Ok(Json(json!({
        "text": output.text,
        "winner": output.winner,
        "finalRatings": participant_map(&output.final_ratings),
    })))
}

pub async fn reset_game(State(host): State<SharedHost>) -> Json<Value> {
    let message = host.reset().await;
    Json(json!({ "message": message }))
}
