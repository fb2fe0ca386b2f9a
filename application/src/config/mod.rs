//! Application-level configuration.
//!
//! - [`GameSettings`]: everything a fresh session is built from
//! - [`CreativityProfile`]: creativity per kind of generation call

pub mod game_settings;

pub use game_settings::{CreativityProfile, GameSettings};
