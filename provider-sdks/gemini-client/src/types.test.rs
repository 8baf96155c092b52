use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_default_generation_config() {
    let config = GenerationConfig::default();
    assert!((config.temperature - 0.7).abs() < f64::EPSILON);
    assert_eq!(config.max_output_tokens, 2048);
    assert_eq!(config.top_k, None);
    assert_eq!(config.top_p, None);
}

#[test]
fn test_generation_config_wire_format_omits_unset_sampling() {
    let value = serde_json::to_value(GenerationConfig::new(0.5, 150)).unwrap();
    assert_eq!(value, json!({"temperature": 0.5, "maxOutputTokens": 150}));
}

#[test]
fn test_generation_config_wire_format_with_sampling() {
    let config = GenerationConfig::new(1.0, 64).with_top_k(40).with_top_p(0.5);
    let value = serde_json::to_value(config).unwrap();
    assert_eq!(
        value,
        json!({"temperature": 1.0, "maxOutputTokens": 64, "topK": 40, "topP": 0.5})
    );
}

#[test]
fn test_temperature_levels() {
    assert!((TemperatureLevel::Low.value() - 0.2).abs() < f64::EPSILON);
    assert!((TemperatureLevel::Medium.value() - 0.7).abs() < f64::EPSILON);
    assert!((TemperatureLevel::High.value() - 1.0).abs() < f64::EPSILON);

    let config = GenerationConfig::from_level(TemperatureLevel::Low);
    assert!((config.temperature - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.max_output_tokens, 2048);
}

#[test]
fn test_single_turn_request_body() {
    let request = GenerateContentRequest::single_turn("Hello", GenerationConfig::default());
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "contents": [{"parts": [{"text": "Hello"}]}],
            "generationConfig": {"temperature": 0.7, "maxOutputTokens": 2048}
        })
    );
}

#[test]
fn test_message_role_wire_values() {
    assert_eq!(serde_json::to_value(MessageRole::User).unwrap(), json!("USER"));
    assert_eq!(serde_json::to_value(MessageRole::Model).unwrap(), json!("MODEL"));
    assert_eq!(serde_json::to_value(MessageRole::System).unwrap(), json!("SYSTEM"));
}

#[test]
fn test_message_is_user() {
    assert!(Message::new(MessageRole::User, "hi", 1).is_user());
    assert!(!Message::new(MessageRole::Model, "hello", 2).is_user());
    assert!(!Message::new(MessageRole::System, "be terse", 0).is_user());
}

#[test]
fn test_parse_history_accepts_well_formed_array() {
    let value = json!([
        {"role": "USER", "content": "Question", "timestamp": 1_700_000_000_000_i64},
        {"role": "MODEL", "content": "Answer", "timestamp": 1_700_000_000_500_i64}
    ]);
    let history = parse_history(&value).unwrap();
    assert_eq!(
        history,
        vec![
            Message::new(MessageRole::User, "Question", 1_700_000_000_000),
            Message::new(MessageRole::Model, "Answer", 1_700_000_000_500),
        ]
    );
}

#[test]
fn test_parse_history_empty_array() {
    assert_eq!(parse_history(&json!([])), Some(Vec::new()));
}

#[test]
fn test_parse_history_rejects_malformed_input() {
    assert_eq!(parse_history(&json!({"role": "USER"})), None);
    assert_eq!(parse_history(&json!("not an array")), None);
    assert_eq!(
        parse_history(&json!([
            {"role": "USER", "content": "ok", "timestamp": 1},
            {"role": "USER", "content": "missing timestamp"}
        ])),
        None
    );
    assert_eq!(parse_history(&json!([null])), None);
}

#[test]
fn test_request_options_builders() {
    let options = RequestOptions::new("prompt")
        .with_config(GenerationConfig::new(0.1, 10))
        .with_history(vec![Message::new(MessageRole::User, "earlier", 5)]);
    assert_eq!(options.prompt, "prompt");
    assert_eq!(options.config.as_ref().map(|c| c.max_output_tokens), Some(10));
    assert_eq!(options.history.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_api_result_accessors() {
    let ok = ApiResult::Success(SuccessResponse {
        data: "hi".to_string(),
        metadata: ResponseMetadata {
            model: DEFAULT_MODEL.to_string(),
            tokens_used: 5,
            finish_reason: "STOP".to_string(),
        },
    });
    assert!(ok.is_success());
    assert!(!ok.is_failure());
    assert_eq!(ok.success().map(|s| s.data.as_str()), Some("hi"));
    assert!(ok.failure().is_none());

    let err = ApiResult::Failure(ErrorResponse {
        error: "boom".to_string(),
        code: UNEXPECTED_FAILURE_CODE,
    });
    assert!(err.is_failure());
    assert!(err.success().is_none());
    assert!(!err.failure().unwrap().is_transport());
}

#[test]
fn test_api_result_serializes_with_success_flag() {
    let ok = ApiResult::Success(SuccessResponse {
        data: "hi".to_string(),
        metadata: ResponseMetadata {
            model: "gemini-2.5-flash-lite".to_string(),
            tokens_used: 5,
            finish_reason: "STOP".to_string(),
        },
    });
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({
            "success": true,
            "data": "hi",
            "metadata": {"model": "gemini-2.5-flash-lite", "tokensUsed": 5, "finishReason": "STOP"}
        })
    );

    let err = ApiResult::Failure(ErrorResponse {
        error: "quota exceeded".to_string(),
        code: 429,
    });
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({"success": false, "error": "quota exceeded", "code": 429})
    );
}
