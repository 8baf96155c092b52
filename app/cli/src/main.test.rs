use super::*;
use pretty_assertions::assert_eq;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("gemini-ask").chain(args.iter().copied()))
        .expect("arguments should parse")
}

fn env() -> AppConfig {
    AppConfig {
        api_key: "AIxxxxxxxxxxxxxxxxxx".to_string(),
        model: "gemini-2.5-flash-lite".to_string(),
        debug: false,
        base_url: None,
    }
}

#[test]
fn test_default_prompt() {
    let cli = parse(&[]);
    assert_eq!(cli.prompts, vec![DEFAULT_PROMPT.to_string()]);
    assert!(cli.generation_config().is_none());
}

#[test]
fn test_multiple_prompts() {
    let cli = parse(&["first", "second"]);
    assert_eq!(cli.prompts, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn test_generation_config_from_flags() {
    let cli = parse(&[
        "--temperature",
        "0.5",
        "--max-output-tokens",
        "150",
        "--top-k",
        "40",
        "hello",
    ]);
    assert_eq!(
        cli.generation_config(),
        Some(GenerationConfig::new(0.5, 150).with_top_k(40))
    );
}

#[test]
fn test_generation_config_from_level() {
    let cli = parse(&["--temperature-level", "high"]);
    assert_eq!(
        cli.generation_config(),
        Some(GenerationConfig::from_level(TemperatureLevel::High))
    );
}

#[test]
fn test_only_token_limit_keeps_default_temperature() {
    let cli = parse(&["--max-output-tokens", "64"]);
    assert_eq!(cli.generation_config(), Some(GenerationConfig::new(0.7, 64)));
}

#[test]
fn test_temperature_conflicts_with_level() {
    let result = Cli::try_parse_from(["gemini-ask", "--temperature", "0.3", "--temperature-level", "low"]);
    assert!(result.is_err());
}

#[test]
fn test_stat_flag_parses_key() {
    let cli = parse(&["--stat", "averageResponseTime"]);
    assert_eq!(cli.stat, Some(StatKey::AverageResponseTime));
    assert!(Cli::try_parse_from(["gemini-ask", "--stat", "bogus"]).is_err());
}

#[test]
fn test_client_config_uses_environment() {
    let cli = parse(&[]);
    let config = cli.client_config(AppConfig {
        debug: true,
        base_url: Some("http://localhost:9000".to_string()),
        ..env()
    });
    assert_eq!(config.model, "gemini-2.5-flash-lite");
    assert!(config.debug);
    assert_eq!(config.base_url, "http://localhost:9000");
}

#[test]
fn test_flags_override_environment() {
    let cli = parse(&["--model", "gemini-2.0-flash", "--base-url", "http://proxy", "--debug"]);
    let config = cli.client_config(env());
    assert_eq!(config.model, "gemini-2.0-flash");
    assert_eq!(config.base_url, "http://proxy");
    assert!(config.debug);
}

#[test]
fn test_load_history_rejects_missing_file() {
    let err = load_history(Path::new("/nonexistent/history.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read history file"));
}

#[test]
fn test_load_history_from_file() {
    let path = std::env::temp_dir().join(format!("gemini-ask-history-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"[{"role":"USER","content":"hi","timestamp":1},{"role":"MODEL","content":"hello","timestamp":2}]"#,
    )
    .unwrap();
    let history = load_history(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(history.len(), 2);
    assert!(history[0].is_user());
    assert!(!history[1].is_user());
}

#[test]
fn test_load_history_rejects_wrong_shape() {
    let path = std::env::temp_dir().join(format!("gemini-ask-bad-history-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"role":"USER"}"#).unwrap();
    let err = load_history(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    assert!(err.to_string().contains("array"));
}
