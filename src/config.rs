//! Configuration for the console chat.
//!
//! A [`ChatConfig`] is resolved once at startup, from the process environment
//! with defaults for everything else, and then moved into the client and the
//! chat.  Nothing reads the environment after that.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Environment variable holding the API key.  Required.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Environment variable overriding the model identifier.  Optional.
pub const MODEL_VAR: &str = "LLM_MODEL";

/// OpenAI-compatible base URL of the Groq API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used when [`MODEL_VAR`] is unset.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Instructions installed at the start of every session.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a concise, helpful assistant for a developer.";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved configuration for a chat session.
#[derive(Clone, PartialEq)]
pub struct ChatConfig {
    /// Bearer token for the endpoint.
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Model identifier, sent as-is.
    pub model: String,

    /// System instructions for the session.
    pub instructions: Option<String>,

    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,

    /// Retry policy applied by the HTTP client.
    pub retry: RetryPolicy,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional cap on generated tokens.
    pub max_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a config for `api_key` with default values.
    ///
    /// Defaults:
    /// - Base URL: the Groq OpenAI-compatible endpoint
    /// - Model: llama-3.3-70b-versatile
    /// - Instructions: [`DEFAULT_INSTRUCTIONS`]
    /// - Timeout: 60 seconds
    /// - Retry: [`RetryPolicy::default`]
    /// - Color: enabled
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            instructions: Some(DEFAULT_INSTRUCTIONS.to_string()),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            temperature: None,
            max_tokens: None,
            use_color: true,
        }
    }

    /// Resolves the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `GROQ_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolves the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::configuration(format!("{API_KEY_VAR} is not set")))?;
        let mut config = Self::new(api_key);
        if let Some(model) = lookup(MODEL_VAR).filter(|model| !model.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        Ok(config)
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets or clears the system instructions.
    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("instructions", &self.instructions)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("use_color", &self.use_color)
            .finish()
    }
}
