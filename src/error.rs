use thiserror::Error;

use crate::llm::BackendError;

/// Errors surfaced by the drafting pipeline
#[derive(Debug, Error)]
pub enum LexError {
    /// A form field failed validation; detected before any backend call
    #[error("campo inválido ({field}): {message}")]
    InvalidInput { field: String, message: String },

    /// The backend failed on every allowed attempt, or failed terminally
    #[error("generation failed at stage '{stage}' after {attempts} attempt(s): {source}")]
    GenerationFailed {
        stage: String,
        attempts: u32,
        #[source]
        source: BackendError,
    },

    /// The model answered, but not with the structure the stage needs
    #[error("malformed response at stage '{stage}': {message}")]
    MalformedResponse { stage: String, message: String },

    #[error("PDF rendering failed: {0}")]
    RenderFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LexError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn malformed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
