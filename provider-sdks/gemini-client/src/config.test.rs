use super::*;

#[test]
fn test_config_defaults() {
    let config = ClientConfig::new("AIxxxxxxxxxxxxxxxxxx");
    assert_eq!(config.api_key, "AIxxxxxxxxxxxxxxxxxx");
    assert_eq!(config.model, "gemini-2.5-flash-lite");
    assert_eq!(
        config.base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert!(!config.debug);
    assert_eq!(config.max_prompt_length, 1000);
    assert_eq!(config.timeout, Duration::from_secs(600));
}

#[test]
fn test_config_builder() {
    let config = ClientConfig::new("AIxxxxxxxxxxxxxxxxxx")
        .model("gemini-2.0-flash")
        .base_url("http://localhost:8080")
        .debug(true)
        .max_prompt_length(10)
        .timeout(Duration::from_secs(5));

    assert_eq!(config.model, "gemini-2.0-flash");
    assert_eq!(config.base_url, "http://localhost:8080");
    assert!(config.debug);
    assert_eq!(config.max_prompt_length, 10);
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn test_config_debug_redacts_key() {
    let config = ClientConfig::new("AIsecretsecretsecretsecret");
    let output = format!("{config:?}");
    assert!(output.contains("[REDACTED]"));
    assert!(!output.contains("AIsecret"));
}
