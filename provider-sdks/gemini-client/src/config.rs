//! Client configuration for the Gemini client.

use std::fmt::Debug;
use std::time::Duration;

use crate::prompt::DEFAULT_MAX_PROMPT_LENGTH;
use crate::types::DEFAULT_BASE_URL;
use crate::types::DEFAULT_MODEL;

/// Configuration for [`Client`](crate::Client).
///
/// The key is validated when the client is built, not here.
#[derive(Clone)]
pub struct ClientConfig {
    /// API key, sent as the `key` query parameter.
    pub api_key: String,

    /// Model identifier, e.g. `gemini-2.5-flash-lite`.
    pub model: String,

    /// Base URL for the API (no trailing slash required).
    pub base_url: String,

    /// Emit request/response diagnostics through `tracing`.
    pub debug: bool,

    /// Prompts longer than this many characters are truncated.
    pub max_prompt_length: usize,

    /// Request timeout.
    pub timeout: Duration,
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .field("max_prompt_length", &self.max_prompt_length)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Default request timeout (10 minutes).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    /// Create a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
            max_prompt_length: DEFAULT_MAX_PROMPT_LENGTH,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Enable or disable debug diagnostics.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the prompt truncation limit.
    pub fn max_prompt_length(mut self, max_prompt_length: usize) -> Self {
        self.max_prompt_length = max_prompt_length;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
