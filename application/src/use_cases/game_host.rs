//! Game host: owner of the active session
//!
//! Transports (the HTTP server, the terminal game) share one [`GameHost`].
//! Operations lock the session for their whole duration, so two requests can
//! never interleave their mutations.

use crate::config::GameSettings;
use crate::ports::game_events::{GameEvent, GameEventLogger, NoGameEventLogger};
use crate::ports::text_generation::TextGenerationGateway;
use crate::use_cases::game_session::{GameSession, SessionSnapshot};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

pub const RESET_MESSAGE: &str = "Game reset successfully";

pub struct GameHost<G: TextGenerationGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    settings: GameSettings,
    events: Arc<dyn GameEventLogger>,
    games_started: AtomicU64,
    session: Mutex<GameSession<G>>,
}

impl<G: TextGenerationGateway + ?Sized + 'static> GameHost<G> {
    pub fn new(gateway: Arc<G>, settings: GameSettings) -> Self {
        let session = GameSession::new(Arc::clone(&gateway), settings.clone());
        Self {
            gateway,
            settings,
            events: Arc::new(NoGameEventLogger),
            games_started: AtomicU64::new(1),
            session: Mutex::new(session),
        }
    }

    /// Route game events of this and every later session to `events`
    pub fn with_event_logger(mut self, events: Arc<dyn GameEventLogger>) -> Self {
        self.events = events;
        let fresh = self.fresh_session(1);
        *self.session.get_mut() = fresh;
        self
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Lock the active session
    pub async fn session(&self) -> MutexGuard<'_, GameSession<G>> {
        self.session.lock().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Throw the active game away and start over at the host introduction
    pub async fn reset(&self) -> &'static str {
        let number = self.games_started.fetch_add(1, Ordering::SeqCst) + 1;
        let fresh = self.fresh_session(number);

        let mut guard = self.session.lock().await;
        let previous = std::mem::replace(&mut *guard, fresh);
        drop(guard);

        info!(
            "Game {} reset at stage {} (round {})",
            previous.game_number(),
            previous.stage(),
            previous.round()
        );
        self.events.log(GameEvent::new(
            "game_reset",
            json!({
                "previousGame": previous.game_number(),
                "previousStage": previous.stage(),
                "game": number,
            }),
        ));
        RESET_MESSAGE
    }

    fn fresh_session(&self, game_number: u64) -> GameSession<G> {
        GameSession::new(Arc::clone(&self.gateway), self.settings.clone())
            .with_event_logger(Arc::clone(&self.events))
            .with_game_number(game_number)
    }
}
