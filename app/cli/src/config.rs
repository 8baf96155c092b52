//! Environment configuration for the CLI.
//!
//! Read once at startup, after `.env` has been loaded into the process
//! environment.

use anyhow::Context;
use gemini_client_sdk::DEFAULT_MODEL;

/// Variable holding the API key.
pub const API_KEY_ENV: &str = "API_KEY";
/// Variable overriding the model.
pub const MODEL_NAME_ENV: &str = "MODEL_NAME";
/// Variable enabling debug diagnostics when set to `true`.
pub const DEBUG_MODE_ENV: &str = "DEBUG_MODE";
/// Variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub debug: bool,
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.is_empty())
            .with_context(|| format!("Missing {API_KEY_ENV} environment variable"))?;

        Ok(Self {
            api_key,
            model: lookup(MODEL_NAME_ENV)
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            debug: lookup(DEBUG_MODE_ENV).as_deref() == Some("true"),
            base_url: lookup(BASE_URL_ENV).filter(|url| !url.is_empty()),
        })
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
