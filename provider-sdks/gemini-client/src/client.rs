//! HTTP client for the generateContent endpoint.

use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::ClientConfig;
use crate::credential::ApiKey;
use crate::error::GeminiError;
use crate::error::Result;
use crate::prompt::format_prompt;
use crate::stats::InFlightRequest;
use crate::stats::Statistics;
use crate::stats::StatsTracker;
use crate::types::ApiResult;
use crate::types::ErrorResponse;
use crate::types::GenerateContentRequest;
use crate::types::RequestOptions;
use crate::types::ResponseMetadata;
use crate::types::SuccessResponse;
use crate::types::UNEXPECTED_FAILURE_CODE;
use crate::types::UNKNOWN_FINISH_REASON;

/// API method used for single-shot generation.
const GENERATE_CONTENT: &str = "generateContent";

/// Error text used when a failed HTTP response has an empty body.
const REQUEST_FAILED: &str = "Request failed";

/// Error text used when an internal failure has no message of its own.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Client for the Generative Language API.
///
/// Every [`ask`](Client::ask) is counted in the client's [`Statistics`].
/// The client is `Send + Sync`; share it behind an `Arc` to issue
/// concurrent requests against the same counters.
#[derive(Debug)]
pub struct Client {
    http_client: reqwest::Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
    debug: bool,
    max_prompt_length: usize,
    stats: StatsTracker,
}

impl Client {
    /// Create a new client with the given configuration.
    ///
    /// Fails with [`GeminiError::InvalidCredential`] if the key does not
    /// start with `AI` or is shorter than 20 characters, and with
    /// [`GeminiError::Configuration`] if the model or base URL is blank.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_key = ApiKey::parse(config.api_key)?;
        if config.model.trim().is_empty() {
            return Err(GeminiError::Configuration("model name is empty".to_string()));
        }
        if config.base_url.trim().is_empty() {
            return Err(GeminiError::Configuration("base url is empty".to_string()));
        }
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            model: config.model,
            base_url: config.base_url,
            debug: config.debug,
            max_prompt_length: config.max_prompt_length,
            stats: StatsTracker::new(),
        })
    }

    /// Create a client for the default model with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(api_key))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Display string for the configured model.
    pub fn model_info(&self) -> String {
        format!("Model: {}", self.model)
    }

    /// Snapshot of the request statistics.
    pub fn stats(&self) -> Statistics {
        self.stats.snapshot()
    }

    /// Zero the request statistics.
    ///
    /// Requests already in flight still settle into the zeroed counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Build the URL for a model method (key not included).
    pub(crate) fn model_url(&self, method: &str) -> String {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!(
            "{}/models/{model}:{method}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Send `options.prompt` to the model and normalize the outcome.
    ///
    /// Never fails: HTTP errors come back as [`ApiResult::Failure`] with the
    /// status code, every other error with code `-1`.
    pub async fn ask(&self, options: RequestOptions) -> ApiResult {
        let mut request = self.stats.start();

        let result = match self.generate(&options, &mut request).await {
            Ok(result) => result,
            Err(err) => {
                if self.debug {
                    warn!(error = %err, "[GeminiClient] Error");
                }
                let message = err.to_string();
                ApiResult::Failure(ErrorResponse {
                    error: if message.is_empty() {
                        UNKNOWN_ERROR.to_string()
                    } else {
                        message
                    },
                    code: UNEXPECTED_FAILURE_CODE,
                })
            }
        };

        if result.is_success() {
            request.succeed();
        } else {
            request.fail();
        }
        result
    }

    async fn generate(
        &self,
        options: &RequestOptions,
        request: &mut InFlightRequest<'_>,
    ) -> Result<ApiResult> {
        let url = self.model_url(GENERATE_CONTENT);
        let prompt = format_prompt(&options.prompt, self.max_prompt_length);
        let generation_config = options.config.clone().unwrap_or_default();
        let body = GenerateContentRequest::single_turn(prompt, generation_config);

        if self.debug {
            info!(url = %format!("{url}?key=[REDACTED]"), "[GeminiClient] Request URL");
            info!(
                payload = %serde_json::to_string_pretty(&body)?,
                "[GeminiClient] Payload"
            );
            if let Some(history) = &options.history {
                debug!(
                    messages = history.len(),
                    "[GeminiClient] History supplied but not sent"
                );
            }
        }

        let sent = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.expose())])
            .json(&body)
            .send()
            .await;
        request.mark_response();
        // The request URL carries the key; keep it out of error messages.
        let response = sent.map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(reqwest::Error::without_url)?;
            if self.debug {
                warn!(status = status.as_u16(), body = %text, "[GeminiClient] HTTP Error");
            }
            return Ok(ApiResult::Failure(ErrorResponse {
                error: if text.is_empty() {
                    REQUEST_FAILED.to_string()
                } else {
                    text
                },
                code: i32::from(status.as_u16()),
            }));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;
        let data: Value = serde_json::from_slice(&bytes)?;

        if self.debug {
            info!(
                data = %serde_json::to_string_pretty(&data)?,
                "[GeminiClient] Response data"
            );
        }

        Ok(ApiResult::Success(SuccessResponse {
            data: self.extract_text(&data),
            metadata: self.extract_metadata(&data),
        }))
    }

    /// Text of the first part of the first candidate, or the whole body
    /// serialized when that is missing, empty, or not a string.
    fn extract_text(&self, data: &Value) -> String {
        match data
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
        {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                if self.debug {
                    debug!("[GeminiClient] No candidate text, returning raw payload");
                }
                data.to_string()
            }
        }
    }

    /// `totalTokenCount` is accepted as any non-negative whole number, including
    /// a float such as `5.0`; anything else counts as 0.
    fn extract_metadata(&self, data: &Value) -> ResponseMetadata {
        let finish_reason = data
            .pointer("/candidates/0/finishReason")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_FINISH_REASON);
        let tokens_used = data
            .pointer("/usageMetadata/totalTokenCount")
            .and_then(token_count)
            .unwrap_or(0);

        ResponseMetadata {
            model: self.model.clone(),
            tokens_used,
            finish_reason: finish_reason.to_string(),
        }
    }
}

fn token_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|count| {
                *count >= 0.0 && count.fract() == 0.0 && *count <= u64::MAX as f64
            })
            .map(|count| count as u64)
    })
}

#[cfg(test)]
#[path = "client.test.rs"]
mod tests;
