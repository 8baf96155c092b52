//! gemini-ask: send prompts to a Gemini model and report usage statistics.

mod config;

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::ValueEnum;
use gemini_client_sdk::ApiResult;
use gemini_client_sdk::Client;
use gemini_client_sdk::ClientConfig;
use gemini_client_sdk::GenerationConfig;
use gemini_client_sdk::MessageHistory;
use gemini_client_sdk::RequestOptions;
use gemini_client_sdk::StatKey;
use gemini_client_sdk::TemperatureLevel;
use gemini_client_sdk::parse_history;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const DEFAULT_PROMPT: &str = "Que veux-dire hello world ?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Level {
    Low,
    Medium,
    High,
}

impl From<Level> for TemperatureLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => TemperatureLevel::Low,
            Level::Medium => TemperatureLevel::Medium,
            Level::High => TemperatureLevel::High,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "gemini-ask")]
#[command(about = "Send prompts to a Gemini model and report usage statistics")]
struct Cli {
    /// Prompts to send, in order
    #[arg(default_value = DEFAULT_PROMPT)]
    prompts: Vec<String>,

    /// Model name (overrides MODEL_NAME)
    #[arg(long)]
    model: Option<String>,

    /// Log request and response diagnostics (overrides DEBUG_MODE)
    #[arg(long)]
    debug: bool,

    /// API base URL (overrides BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Sampling temperature
    #[arg(long, conflicts_with = "temperature_level")]
    temperature: Option<f64>,

    /// Named temperature preset
    #[arg(long, value_enum)]
    temperature_level: Option<Level>,

    /// Maximum output tokens
    #[arg(long)]
    max_output_tokens: Option<u32>,

    /// Top-k sampling
    #[arg(long)]
    top_k: Option<u32>,

    /// Top-p (nucleus) sampling
    #[arg(long)]
    top_p: Option<f64>,

    /// JSON file holding prior messages
    #[arg(long)]
    history: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print a single statistic instead of the full snapshot
    #[arg(long)]
    stat: Option<StatKey>,
}

impl Cli {
    /// Generation config from the flags, or `None` to use the client default.
    fn generation_config(&self) -> Option<GenerationConfig> {
        if self.temperature.is_none()
            && self.temperature_level.is_none()
            && self.max_output_tokens.is_none()
            && self.top_k.is_none()
            && self.top_p.is_none()
        {
            return None;
        }

        let mut config = self
            .temperature_level
            .map(|level| GenerationConfig::from_level(level.into()))
            .unwrap_or_default();
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            config.max_output_tokens = max_output_tokens;
        }
        config.top_k = self.top_k;
        config.top_p = self.top_p;
        Some(config)
    }

    fn client_config(&self, env: AppConfig) -> ClientConfig {
        let mut config = ClientConfig::new(env.api_key)
            .model(self.model.clone().unwrap_or(env.model))
            .debug(self.debug || env.debug);
        if let Some(base_url) = self.base_url.clone().or(env.base_url) {
            config = config.base_url(base_url);
        }
        config
    }
}

fn load_history(path: &Path) -> anyhow::Result<MessageHistory> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("History file is not valid JSON: {}", path.display()))?;
    parse_history(&value).with_context(|| {
        format!(
            "History file must be an array of {{role, content, timestamp}} objects: {}",
            path.display()
        )
    })
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let default_directives = if debug {
        "gemini_client_sdk=debug,gemini_ask=debug"
    } else {
        "gemini_client_sdk=info,gemini_ask=info"
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn print_result(result: &ApiResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    match result {
        ApiResult::Success(ok) => {
            println!("Generated Text: {}", ok.data);
            println!(
                "  tokens: {}, finish reason: {}",
                ok.metadata.tokens_used, ok.metadata.finish_reason
            );
        }
        ApiResult::Failure(err) => {
            eprintln!("Error Response: {} (code {})", err.error, err.code);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();
    let env = AppConfig::from_env()?;
    init_tracing(cli.debug || env.debug)?;

    let client = Client::new(cli.client_config(env))?;
    println!("{}", client.model_info());

    let history = cli.history.as_deref().map(load_history).transpose()?;
    let generation_config = cli.generation_config();

    for prompt in &cli.prompts {
        let mut options = RequestOptions::new(prompt.as_str());
        if let Some(config) = &generation_config {
            options = options.with_config(config.clone());
        }
        if let Some(history) = &history {
            options = options.with_history(history.clone());
        }
        debug!(prompt = %prompt, "asking");
        let result = client.ask(options).await;
        print_result(&result, cli.json)?;
    }

    let stats = client.stats();
    match cli.stat {
        Some(key) => println!("{key}: {}", stats.get(key)),
        None => println!("Statistics: {}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

#[cfg(test)]
#[path = "main.test.rs"]
mod tests;
