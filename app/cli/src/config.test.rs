use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn test_minimal_environment() {
    let config = AppConfig::from_lookup(lookup_from(&[("API_KEY", "AIxxxxxxxxxxxxxxxxxx")])).unwrap();
    assert_eq!(
        config,
        AppConfig {
            api_key: "AIxxxxxxxxxxxxxxxxxx".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            debug: false,
            base_url: None,
        }
    );
}

#[test]
fn test_full_environment() {
    let config = AppConfig::from_lookup(lookup_from(&[
        ("API_KEY", "AIxxxxxxxxxxxxxxxxxx"),
        ("MODEL_NAME", "gemini-2.0-flash"),
        ("DEBUG_MODE", "true"),
        ("BASE_URL", "http://localhost:9000/v1beta"),
    ]))
    .unwrap();
    assert_eq!(config.model, "gemini-2.0-flash");
    assert!(config.debug);
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/v1beta"));
}

#[test]
fn test_debug_mode_requires_literal_true() {
    for value in ["1", "TRUE", "yes", ""] {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("API_KEY", "AIxxxxxxxxxxxxxxxxxx"),
            ("DEBUG_MODE", value),
        ]))
        .unwrap();
        assert!(!config.debug, "DEBUG_MODE={value:?} should not enable debug");
    }
}

#[test]
fn test_missing_api_key() {
    let err = AppConfig::from_lookup(lookup_from(&[("MODEL_NAME", "m")])).unwrap_err();
    assert!(err.to_string().contains("API_KEY"));

    let err = AppConfig::from_lookup(lookup_from(&[("API_KEY", "")])).unwrap_err();
    assert!(err.to_string().contains("API_KEY"));
}

#[test]
fn test_empty_model_uses_default() {
    let config = AppConfig::from_lookup(lookup_from(&[
        ("API_KEY", "AIxxxxxxxxxxxxxxxxxx"),
        ("MODEL_NAME", ""),
    ]))
    .unwrap();
    assert_eq!(config.model, "gemini-2.5-flash-lite");
}
