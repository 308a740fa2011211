use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::LexError;
use crate::llm::{
    AnthropicClient, AnthropicConfig, GeminiClient, GeminiConfig, GenerationBackend, RetryPolicy,
};
use crate::models::ValidationLimits;
use crate::stages::GenerationParams;

/// Text-generation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Provider {
    #[default]
    Gemini,
    Anthropic,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    pub fn api_key_var(self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gemini => f.write_str("gemini"),
            Provider::Anthropic => f.write_str("anthropic"),
        }
    }
}

impl FromStr for Provider {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(LexError::Config(format!("unknown provider '{}'", other))),
        }
    }
}

/// Process-wide settings, read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: Provider,
    /// Key for the selected provider; only required when a backend is built
    pub api_key: Option<String>,
    pub model: String,
    pub params: GenerationParams,
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub limits: ValidationLimits,
    pub wkhtmltopdf_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let provider = Provider::default();
        Self {
            provider,
            api_key: None,
            model: provider.default_model().to_string(),
            params: GenerationParams::default(),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
            limits: ValidationLimits::default(),
            wkhtmltopdf_path: None,
        }
    }
}

impl Settings {
    /// Create settings from environment variables
    pub fn from_env() -> Result<Self, LexError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create settings from any variable source; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Settings::default();

        let provider = match var("LEXGENIUS_PROVIDER") {
            Some(value) => value.parse()?,
            None => defaults.provider,
        };

        Ok(Self {
            provider,
            api_key: var(provider.api_key_var()),
            model: var("LEXGENIUS_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            params: GenerationParams {
                max_tokens: parse_var(&var, "LEXGENIUS_MAX_TOKENS", defaults.params.max_tokens)?,
                temperature: parse_var(&var, "LEXGENIUS_TEMPERATURE", defaults.params.temperature)?,
            },
            max_retries: parse_var(&var, "LEXGENIUS_MAX_RETRIES", defaults.max_retries)?,
            retry_delay: Duration::from_millis(parse_var(&var, "LEXGENIUS_RETRY_DELAY_MS", 1000)?),
            timeout: Duration::from_secs(parse_var(&var, "LEXGENIUS_TIMEOUT_SECS", 30)?),
            cache_ttl: Duration::from_secs(parse_var(&var, "LEXGENIUS_CACHE_TTL_SECS", 300)?),
            limits: ValidationLimits {
                min_text_length: parse_var(
                    &var,
                    "LEXGENIUS_MIN_TEXT",
                    defaults.limits.min_text_length,
                )?,
                max_text_length: parse_var(
                    &var,
                    "LEXGENIUS_MAX_TEXT",
                    defaults.limits.max_text_length,
                )?,
            },
            wkhtmltopdf_path: var("WKHTMLTOPDF_PATH").map(PathBuf::from),
        }
        .checked()?)
    }

    /// Switch provider, resetting the model and key that belong to it
    pub fn with_provider<F>(mut self, provider: Provider, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if provider != self.provider {
            self.provider = provider;
            self.model = provider.default_model().to_string();
            self.api_key = lookup(provider.api_key_var()).filter(|key| !key.trim().is_empty());
        }
        self
    }

    fn checked(self) -> Result<Self, LexError> {
        if self.limits.min_text_length > self.limits.max_text_length {
            return Err(LexError::Config(format!(
                "LEXGENIUS_MIN_TEXT ({}) exceeds LEXGENIUS_MAX_TEXT ({})",
                self.limits.min_text_length, self.limits.max_text_length
            )));
        }
        if !(0.0..=2.0).contains(&self.params.temperature) {
            return Err(LexError::Config(format!(
                "LEXGENIUS_TEMPERATURE must be between 0 and 2, got {}",
                self.params.temperature
            )));
        }
        Ok(self)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }

    /// Build the HTTP client for the configured provider
    pub fn build_backend(&self) -> Result<Arc<dyn GenerationBackend>, LexError> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            LexError::Config(format!(
                "{} environment variable not set",
                self.provider.api_key_var()
            ))
        })?;

        let backend: Arc<dyn GenerationBackend> = match self.provider {
            Provider::Gemini => {
                let mut config = GeminiConfig::new(api_key, self.model.clone());
                config.timeout = self.timeout;
                Arc::new(GeminiClient::new(config).map_err(|e| LexError::Config(e.to_string()))?)
            }
            Provider::Anthropic => {
                let mut config = AnthropicConfig::new(api_key, self.model.clone());
                config.timeout = self.timeout;
                Arc::new(
                    AnthropicClient::new(config).map_err(|e| LexError::Config(e.to_string()))?,
                )
            }
        };
        Ok(backend)
    }
}

fn parse_var<T, V>(var: &V, name: &str, default: T) -> Result<T, LexError>
where
    T: FromStr,
    T::Err: fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| LexError::Config(format!("invalid {} '{}': {}", name, value, e))),
        None => Ok(default),
    }
}
