use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of a single backend call
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// The call succeeded but carried no text
    #[error("empty response from model")]
    EmptyResponse,

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// How a retry policy should treat a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    Retryable,
    Terminal,
}

impl BackendError {
    /// Default classification: network trouble, throttling, server errors and
    /// empty answers are worth another attempt; client errors are not.
    pub fn classify(&self) -> RetryClass {
        match self {
            BackendError::Transport(_) | BackendError::EmptyResponse => RetryClass::Retryable,
            BackendError::Api { status, .. } if *status == 429 || *status >= 500 => {
                RetryClass::Retryable
            }
            BackendError::Api { .. } => RetryClass::Terminal,
            BackendError::Decode(_) => RetryClass::Retryable,
        }
    }
}

/// A text-generation service
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for a prompt. Implementations must return
    /// `BackendError::EmptyResponse` instead of an empty string.
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, BackendError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Reject blank generations so every implementation fails the same way
pub fn non_empty(text: String) -> Result<String, BackendError> {
    if text.trim().is_empty() {
        Err(BackendError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Backend that replays scripted outcomes and records prompts
    pub struct ScriptedBackend {
        outcomes: Mutex<VecDeque<Result<String, BackendError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn new(outcomes: Vec<Result<String, BackendError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
        }

        pub fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(
            &self,
            prompt: &str,
            _max_tokens: u32,
            _temperature: f64,
        ) -> Result<String, BackendError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.outcomes.lock().unwrap().pop_front() {
                Some(outcome) => outcome.and_then(non_empty),
                None => Err(BackendError::EmptyResponse),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
