//! Request, response and result types for the generateContent API.
//!
//! The outbound request is strongly typed. The inbound body is deliberately
//! *not*: it is read as a [`serde_json::Value`] and mined field by field in
//! [`crate::client`], so a drifting upstream schema degrades to defaults
//! instead of failing the request.

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeStruct;

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Base URL of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Error code reported for failures that did not come from an HTTP status.
pub const UNEXPECTED_FAILURE_CODE: i32 = -1;

/// Finish reason reported when the response does not carry one.
pub const UNKNOWN_FINISH_REASON: &str = "UNKNOWN";

// ============================================================================
// Enums
// ============================================================================

/// Author of a message in a conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageRole {
    User,
    Model,
    System,
}

/// Named temperature presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureLevel {
    Low,
    Medium,
    High,
}

impl TemperatureLevel {
    /// Sampling temperature for this preset.
    pub fn value(self) -> f64 {
        match self {
            TemperatureLevel::Low => 0.2,
            TemperatureLevel::Medium => 0.7,
            TemperatureLevel::High => 1.0,
        }
    }
}

// ============================================================================
// History
// ============================================================================

/// One message of a prior conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// Ordered list of prior messages.
pub type MessageHistory = Vec<Message>;

/// Interpret a loosely typed JSON value as a message history.
///
/// Returns `None` unless `value` is an array whose every element is an
/// object with well-typed `role`, `content` and `timestamp` fields.
pub fn parse_history(value: &serde_json::Value) -> Option<MessageHistory> {
    value
        .as_array()?
        .iter()
        .map(|item| Message::deserialize(item).ok())
        .collect()
}

// ============================================================================
// Request
// ============================================================================

/// Decoding parameters forwarded verbatim as `generationConfig`.
///
/// No bounds are enforced here; out-of-range values are the API's to reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,

    pub max_output_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl GenerationConfig {
    /// Default sampling temperature.
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;

    /// Default output token limit.
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

    pub fn new(temperature: f64, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            max_output_tokens,
            top_k: None,
            top_p: None,
        }
    }

    /// Default token limit with the temperature of a named preset.
    pub fn from_level(level: TemperatureLevel) -> Self {
        Self::new(level.value(), Self::DEFAULT_MAX_OUTPUT_TOKENS)
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TEMPERATURE, Self::DEFAULT_MAX_OUTPUT_TOKENS)
    }
}

/// Caller-facing options for a single `ask`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestOptions {
    pub prompt: String,
    /// Falls back to [`GenerationConfig::default`] when absent.
    pub config: Option<GenerationConfig>,
    /// Accepted for API compatibility; not folded into the request body.
    pub history: Option<MessageHistory>,
}

impl RequestOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            config: None,
            history: None,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_history(mut self, history: MessageHistory) -> Self {
        self.history = Some(history);
        self
    }
}

/// A single text part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Multi-part content of one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Request body for generateContent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Single-turn request carrying `prompt` as its only part.
    pub fn single_turn(prompt: impl Into<String>, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            generation_config,
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Metadata extracted from a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub model: String,
    pub tokens_used: u64,
    pub finish_reason: String,
}

/// Payload of a successful `ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Generated text, or the serialized response body when no text was
    /// found at the expected location.
    pub data: String,
    pub metadata: ResponseMetadata,
}

/// Payload of a failed `ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// HTTP status code, or [`UNEXPECTED_FAILURE_CODE`].
    pub code: i32,
}

impl ErrorResponse {
    /// Whether the failure came from a non-success HTTP status.
    pub fn is_transport(&self) -> bool {
        self.code != UNEXPECTED_FAILURE_CODE
    }
}

/// Outcome of [`Client::ask`](crate::Client::ask).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult {
    Success(SuccessResponse),
    Failure(ErrorResponse),
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn success(&self) -> Option<&SuccessResponse> {
        match self {
            ApiResult::Success(response) => Some(response),
            ApiResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ErrorResponse> {
        match self {
            ApiResult::Success(_) => None,
            ApiResult::Failure(response) => Some(response),
        }
    }
}

/// Serializes as `{"success": true, "data": .., "metadata": ..}` or
/// `{"success": false, "error": .., "code": ..}`.
impl Serialize for ApiResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ApiResult::Success(response) => {
                let mut state = serializer.serialize_struct("ApiResult", 3)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", &response.data)?;
                state.serialize_field("metadata", &response.metadata)?;
                state.end()
            }
            ApiResult::Failure(response) => {
                let mut state = serializer.serialize_struct("ApiResult", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &response.error)?;
                state.serialize_field("code", &response.code)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
#[path = "types.test.rs"]
mod tests;
