//! Text generation gateway port
//!
//! Defines the interface for asking a language model to fill an instruction.

use async_trait::async_trait;
use spotlight_domain::{Creativity, InstructionTemplate, SlotValues, TemplateError};
use thiserror::Error;

/// Errors that can occur while generating text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Other error: {0}")]
    Other(String),
}

impl GenerationError {
    /// Whether trying the same call again may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::ConnectionError(_) | GenerationError::Timeout => true,
            GenerationError::RequestFailed { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Gateway for text generation
///
/// This port defines how the game session asks for generated text.
/// Implementations (adapters) live in the infrastructure layer and may retry
/// internally; to the session a call either returns text or fails.
#[async_trait]
pub trait TextGenerationGateway: Send + Sync {
    /// Fill `template` with `slots` and generate a response at `creativity`
    async fn generate(
        &self,
        template: &InstructionTemplate,
        slots: &SlotValues,
        creativity: Creativity,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(GenerationError::Timeout.is_transient());
        assert!(GenerationError::ConnectionError("reset".into()).is_transient());
        assert!(
            GenerationError::RequestFailed {
                status: 503,
                message: "busy".into()
            }
            .is_transient()
        );
        assert!(
            GenerationError::RequestFailed {
                status: 429,
                message: "slow down".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_permanent_errors() {
        assert!(
            !GenerationError::RequestFailed {
                status: 401,
                message: "bad key".into()
            }
            .is_transient()
        );
        assert!(!GenerationError::EmptyResponse.is_transient());
        assert!(!GenerationError::MissingCredentials("MISTRAL_API_KEY".into()).is_transient());
    }
}
