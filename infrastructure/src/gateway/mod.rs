//! Text generation adapters
//!
//! Implementations of the [`TextGenerationGateway`](spotlight_application::TextGenerationGateway)
//! port.

mod chat_completions;

pub use chat_completions::{ChatCompletionsGateway, RetryPolicy};
