use super::*;

#[test]
fn test_invalid_credential_message() {
    let err = GeminiError::InvalidCredential("must start with 'AI'".to_string());
    assert_eq!(err.to_string(), "Invalid API key: must start with 'AI'");
    assert!(err.is_credential_error());
}

#[test]
fn test_parse_error_is_transparent() {
    let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let expected = source.to_string();
    let err = GeminiError::from(source);
    assert_eq!(err.to_string(), expected);
    assert!(!err.is_credential_error());
}

#[test]
fn test_configuration_error() {
    let err = GeminiError::Configuration("base url is empty".to_string());
    assert_eq!(err.to_string(), "configuration error: base url is empty");
    assert!(!err.is_credential_error());
}
