//! Mapping of session errors onto HTTP responses

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use spotlight_application::SessionError;
use spotlight_domain::GameError;
use tracing::{debug, warn};

/// A failed request, rendered as `{"error": ..., "kind": ...}`
#[derive(Debug)]
pub enum ApiError {
    /// The game operation itself failed
    Session(SessionError),
    /// The request body could not be read as JSON of the expected shape
    Body(JsonRejection),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self::Session(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

pub fn status_for(err: &SessionError) -> StatusCode {
    match err {
        SessionError::Game(game) => match game {
            GameError::InvalidStage { .. }
            | GameError::GameComplete
            | GameError::AnswerAlreadySubmitted { .. }
            | GameError::NoRatings(_)
            | GameError::IncompleteRatings(_) => StatusCode::CONFLICT,
            GameError::WrongParticipant { .. } => StatusCode::FORBIDDEN,
            GameError::InvalidRating { .. } | GameError::UnparsableRating(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GameError::MissingQuestion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        SessionError::Generation(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn json_error(status: StatusCode, msg: &str, kind: &str) -> Response {
    (status, Json(json!({ "error": msg, "kind": kind }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Session(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    warn!("Game operation failed: {}", err);
                }
                json_error(status, &err.to_string(), err.kind())
            }
            ApiError::Body(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                json_error(rejection.status(), &rejection.body_text(), "invalid_request")
            }
        }
    }
}
