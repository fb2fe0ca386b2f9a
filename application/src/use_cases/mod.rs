//! Use cases (application services)

pub mod game_host;
pub mod game_session;
