use super::*;

#[test]
fn test_short_prompt_is_unchanged() {
    assert_eq!(format_prompt("hello", 10), "hello");
    assert_eq!(format_prompt("", 10), "");
}

#[test]
fn test_prompt_at_limit_is_unchanged() {
    let prompt = "a".repeat(DEFAULT_MAX_PROMPT_LENGTH);
    assert_eq!(format_prompt(&prompt, DEFAULT_MAX_PROMPT_LENGTH), prompt);
}

#[test]
fn test_long_prompt_is_truncated_with_marker() {
    let prompt = "b".repeat(DEFAULT_MAX_PROMPT_LENGTH + 1);
    let formatted = format_prompt(&prompt, DEFAULT_MAX_PROMPT_LENGTH);

    assert!(formatted.ends_with(TRUNCATION_MARKER));
    let body = formatted.strip_suffix(TRUNCATION_MARKER).unwrap();
    assert_eq!(body.chars().count(), DEFAULT_MAX_PROMPT_LENGTH);
}

#[test]
fn test_truncation_respects_char_boundaries() {
    let formatted = format_prompt("héllo wörld", 4);
    assert_eq!(formatted, "héll...");
}

#[test]
fn test_zero_limit() {
    assert_eq!(format_prompt("abc", 0), "...");
    assert_eq!(format_prompt("", 0), "");
}
