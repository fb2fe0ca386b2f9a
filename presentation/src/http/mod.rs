//! HTTP transport for the game
//!
//! A thin JSON layer over [`GameHost`]: each route locks the active session,
//! runs one operation and serializes the result. Errors become
//! `{"error", "kind"}` bodies with a status per error kind.

pub mod error;
mod handlers;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use spotlight_application::{GameHost, TextGenerationGateway};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::ApiError;

/// Host shared by every request
pub type SharedHost = Arc<GameHost<dyn TextGenerationGateway>>;

pub fn router(host: SharedHost, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/state", get(handlers::state))
        .route("/host-introduction", post(handlers::host_introduction))
        .route("/ai-introduction", post(handlers::ai_introduction))
        .route("/generate-question", post(handlers::generate_question))
        .route("/next-question", post(handlers::next_question))
        .route("/submit-answer", post(handlers::submit_answer))
        .route("/collect-ai-answers", post(handlers::collect_ai_answers))
        .route("/rate-answers", post(handlers::rate_answers))
        .route("/next-round", post(handlers::next_round))
        .route("/announce-winner", post(handlers::announce_winner))
        .route("/reset-game", post(handlers::reset_game))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(host)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind `address` and serve until the process is stopped
pub async fn serve(
    host: SharedHost,
    address: &str,
    allowed_origins: &[String],
) -> std::io::Result<()> {
    let app = router(host, allowed_origins);
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Spotlight listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}
