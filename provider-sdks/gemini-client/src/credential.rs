//! API key newtype with shape validation and redacted Debug output.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::{self};

use crate::error::GeminiError;
use crate::error::Result;

/// Prefix every Generative Language API key starts with.
pub const API_KEY_PREFIX: &str = "AI";

/// Minimum number of characters in a well-formed key, prefix included.
pub const API_KEY_MIN_LENGTH: usize = 20;

/// Returns `true` if `raw` starts with [`API_KEY_PREFIX`] and is at least
/// [`API_KEY_MIN_LENGTH`] characters long.
pub fn is_valid_api_key(raw: &str) -> bool {
    raw.starts_with(API_KEY_PREFIX) && raw.chars().count() >= API_KEY_MIN_LENGTH
}

/// A validated API key.
///
/// The Debug implementation never prints the key; use [`ApiKey::expose`]
/// where the raw value is actually needed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate and wrap a raw key.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if !is_valid_api_key(&raw) {
            return Err(GeminiError::InvalidCredential(format!(
                "must start with '{API_KEY_PREFIX}' and be at least {API_KEY_MIN_LENGTH} characters long"
            )));
        }
        Ok(Self(raw))
    }

    /// Explicitly expose the key for actual use.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

#[cfg(test)]
#[path = "credential.test.rs"]
mod tests;
