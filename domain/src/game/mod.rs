//! Game domain
//!
//! The pieces a single game session is assembled from:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`stage`] | [`Stage`](stage::Stage) enumeration and the [`StageMachine`](stage::StageMachine) |
//! | [`ledger`] | Per-contestant ratings, means and winner selection |
//! | [`log`] | Append-only record of questions and answers |
//! | [`roster`] | Contestant identifiers, the human seat and AI personalities |
//! | [`rating`] | Rating value object and extraction from generated text |

pub mod ledger;
pub mod log;
pub mod rating;
pub mod roster;
pub mod stage;
