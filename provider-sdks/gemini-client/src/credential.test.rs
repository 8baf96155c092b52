use super::*;

#[test]
fn test_twenty_character_key_is_valid() {
    let raw = "AIxxxxxxxxxxxxxxxxxx";
    assert_eq!(raw.len(), 20);
    assert!(is_valid_api_key(raw));
    let key = ApiKey::parse(raw).unwrap();
    assert_eq!(key.expose(), raw);
}

#[test]
fn test_short_key_is_rejected() {
    assert!(!is_valid_api_key("AIshort"));
    let err = ApiKey::parse("AIshort").unwrap_err();
    assert!(matches!(err, GeminiError::InvalidCredential(_)));
}

#[test]
fn test_wrong_prefix_is_rejected() {
    assert!(!is_valid_api_key("sk-xxxxxxxxxxxxxxxxxxxxxxxx"));
    assert!(!is_valid_api_key("aixxxxxxxxxxxxxxxxxxxx"));
    assert!(!is_valid_api_key(""));
}

#[test]
fn test_nineteen_characters_is_too_short() {
    let raw = format!("AI{}", "x".repeat(17));
    assert_eq!(raw.len(), 19);
    assert!(!is_valid_api_key(&raw));
    assert!(is_valid_api_key(&format!("{raw}x")));
}

#[test]
fn test_long_keys_are_valid() {
    let raw = format!("AIza{}", "0".repeat(35));
    assert!(is_valid_api_key(&raw));
}

#[test]
fn test_debug_is_redacted() {
    let key = ApiKey::parse("AIsecretsecretsecretsecret").unwrap();
    let debug_output = format!("{key:?}");
    assert_eq!(debug_output, "ApiKey([REDACTED])");
    assert!(!debug_output.contains("secret"));
}
