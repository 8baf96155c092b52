//! Minimal client for the Google Generative Language (Gemini) API.
//!
//! A [`Client`] sends one `generateContent` request per [`Client::ask`],
//! folds every outcome into an [`ApiResult`], and keeps running
//! [`Statistics`] (attempts, successes, failures, mean latency).
//!
//! # Example
//!
//! ```no_run
//! use gemini_client_sdk::{ApiResult, Client, ClientConfig, GenerationConfig, RequestOptions};
//!
//! # async fn example() -> gemini_client_sdk::Result<()> {
//! let client = Client::new(ClientConfig::new("AIza...your-key...").debug(true))?;
//! let options = RequestOptions::new("What does hello world mean?")
//!     .with_config(GenerationConfig::new(0.5, 150));
//!
//! match client.ask(options).await {
//!     ApiResult::Success(ok) => println!("{}", ok.data),
//!     ApiResult::Failure(err) => eprintln!("{} ({})", err.error, err.code),
//! }
//! println!("{:?}", client.stats());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod credential;
mod error;
mod prompt;
mod stats;
mod types;

pub use client::Client;
pub use config::ClientConfig;
pub use credential::API_KEY_MIN_LENGTH;
pub use credential::API_KEY_PREFIX;
pub use credential::ApiKey;
pub use credential::is_valid_api_key;
pub use error::GeminiError;
pub use error::Result;
pub use prompt::DEFAULT_MAX_PROMPT_LENGTH;
pub use prompt::TRUNCATION_MARKER;
pub use prompt::format_prompt;
pub use stats::InFlightRequest;
pub use stats::RequestOutcome;
pub use stats::StatKey;
pub use stats::Statistics;
pub use stats::StatsTracker;
pub use types::ApiResult;
pub use types::Content;
pub use types::DEFAULT_BASE_URL;
pub use types::DEFAULT_MODEL;
pub use types::ErrorResponse;
pub use types::GenerateContentRequest;
pub use types::GenerationConfig;
pub use types::Message;
pub use types::MessageHistory;
pub use types::MessageRole;
pub use types::Part;
pub use types::RequestOptions;
pub use types::ResponseMetadata;
pub use types::SuccessResponse;
pub use types::TemperatureLevel;
pub use types::UNEXPECTED_FAILURE_CODE;
pub use types::UNKNOWN_FINISH_REASON;
pub use types::parse_history;
