use super::*;
use crate::error::GeminiError;
use crate::types::GenerationConfig;
use crate::types::Message;
use crate::types::MessageRole;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing_test::traced_test;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

const TEST_KEY: &str = "AIxxxxxxxxxxxxxxxxxx";
const GENERATE_PATH: &str = "/models/gemini-2.5-flash-lite:generateContent";

fn make_client(base_url: &str) -> Client {
    Client::new(ClientConfig::new(TEST_KEY).base_url(base_url))
        .expect("client creation should succeed")
}

fn success_body() -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": "hi"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"totalTokenCount": 5}
    })
}

async fn mount_success(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ========== Construction ==========

#[test]
fn test_valid_key_constructs() {
    let client = Client::with_api_key(TEST_KEY).unwrap();
    assert_eq!(client.model(), "gemini-2.5-flash-lite");
    assert!(!client.is_debug());
    assert_eq!(client.stats(), Statistics::default());
}

#[test]
fn test_short_key_is_rejected() {
    let err = Client::with_api_key("AIshort").unwrap_err();
    assert!(matches!(err, GeminiError::InvalidCredential(_)));
}

#[test]
fn test_wrong_prefix_is_rejected() {
    let err = Client::new(ClientConfig::new("sk-xxxxxxxxxxxxxxxxxxxxxxxxx")).unwrap_err();
    assert!(err.is_credential_error());
}

#[test]
fn test_blank_model_or_base_url_is_rejected() {
    let err = Client::new(ClientConfig::new(TEST_KEY).model("  ")).unwrap_err();
    assert!(matches!(err, GeminiError::Configuration(_)));
    assert_eq!(err.to_string(), "configuration error: model name is empty");

    let err = Client::new(ClientConfig::new(TEST_KEY).base_url("")).unwrap_err();
    assert!(matches!(err, GeminiError::Configuration(_)));
    assert!(!err.is_credential_error());
}

#[test]
fn test_model_info() {
    let client = Client::new(ClientConfig::new(TEST_KEY).model("gemini-2.0-flash")).unwrap();
    assert_eq!(client.model_info(), "Model: gemini-2.0-flash");
}

#[test]
fn test_model_url() {
    let client = Client::with_api_key(TEST_KEY).unwrap();
    assert_eq!(
        client.model_url("generateContent"),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-lite:generateContent"
    );
}

#[test]
fn test_model_url_strips_models_prefix_and_trailing_slash() {
    let client = Client::new(
        ClientConfig::new(TEST_KEY)
            .model("models/gemini-2.0-flash")
            .base_url("https://proxy.example.com/v1/"),
    )
    .unwrap();
    assert_eq!(
        client.model_url("generateContent"),
        "https://proxy.example.com/v1/models/gemini-2.0-flash:generateContent"
    );
}

// ========== Success path ==========

#[tokio::test]
async fn test_ask_success() {
    let server = MockServer::start().await;
    mount_success(&server, success_body()).await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;

    assert_eq!(
        result,
        ApiResult::Success(SuccessResponse {
            data: "hi".to_string(),
            metadata: ResponseMetadata {
                model: "gemini-2.5-flash-lite".to_string(),
                tokens_used: 5,
                finish_reason: "STOP".to_string(),
            },
        })
    );

    let stats = client.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.failed_requests, 0);
    assert!(stats.average_response_time >= 0.0);
}

#[tokio::test]
async fn test_ask_sends_key_header_and_default_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", TEST_KEY))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "Hello"}]}],
            "generationConfig": {"temperature": 0.7, "maxOutputTokens": 2048}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_ask_forwards_caller_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "Hello"}]}],
            "generationConfig": {
                "temperature": 0.5,
                "maxOutputTokens": 150,
                "topK": 40,
                "topP": 0.9
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;
    let client = make_client(&server.uri());

    let config = GenerationConfig::new(0.5, 150).with_top_k(40).with_top_p(0.9);
    let result = client
        .ask(RequestOptions::new("Hello").with_config(config))
        .await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_ask_does_not_send_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "Follow-up"}]}],
            "generationConfig": {"temperature": 0.7, "maxOutputTokens": 2048}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;
    let client = Client::new(
        ClientConfig::new(TEST_KEY)
            .base_url(server.uri())
            .debug(true),
    )
    .unwrap();

    let options = RequestOptions::new("Follow-up").with_history(vec![
        Message::new(MessageRole::User, "First", 1),
        Message::new(MessageRole::Model, "Reply", 2),
    ]);
    assert!(client.ask(options).await.is_success());
}

#[tokio::test]
async fn test_ask_truncates_long_prompt() {
    let server = MockServer::start().await;
    let expected = format!("{}...", "a".repeat(10));
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": expected}]}],
            "generationConfig": {"temperature": 0.7, "maxOutputTokens": 2048}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;
    let client = Client::new(
        ClientConfig::new(TEST_KEY)
            .base_url(server.uri())
            .max_prompt_length(10),
    )
    .unwrap();

    let result = client.ask(RequestOptions::new("a".repeat(25))).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_ask_missing_candidates_returns_serialized_body() {
    let server = MockServer::start().await;
    let body = json!({"usageMetadata": {"promptTokenCount": 3}, "modelVersion": "x"});
    mount_success(&server, body.clone()).await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;

    let success = result.success().expect("should succeed");
    assert_eq!(success.data, body.to_string());
    assert_eq!(success.metadata.tokens_used, 0);
    assert_eq!(success.metadata.finish_reason, "UNKNOWN");
    assert_eq!(success.metadata.model, "gemini-2.5-flash-lite");
    assert_eq!(client.stats().successful_requests, 1);
}

#[tokio::test]
async fn test_ask_wrong_typed_fields_fall_back_to_defaults() {
    let server = MockServer::start().await;
    let body = json!({
        "candidates": [{
            "content": {"parts": [{"text": 42}]},
            "finishReason": 7
        }],
        "usageMetadata": {"totalTokenCount": "many"}
    });
    mount_success(&server, body.clone()).await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;

    let success = result.success().expect("should succeed");
    assert_eq!(success.data, body.to_string());
    assert_eq!(success.metadata.tokens_used, 0);
    assert_eq!(success.metadata.finish_reason, "UNKNOWN");
}

#[tokio::test]
async fn test_ask_accepts_whole_float_token_count() {
    let server = MockServer::start().await;
    let body = json!({
        "candidates": [{"content": {"parts": [{"text": "hi"}]}, "finishReason": "STOP"}],
        "usageMetadata": {"totalTokenCount": 5.0}
    });
    mount_success(&server, body).await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;
    assert_eq!(result.success().expect("should succeed").metadata.tokens_used, 5);

    for count in [json!(2.5), json!(-3)] {
        server.reset().await;
        mount_success(
            &server,
            json!({
                "candidates": [{"content": {"parts": [{"text": "hi"}]}}],
                "usageMetadata": {"totalTokenCount": count}
            }),
        )
        .await;
        let result = client.ask(RequestOptions::new("Hello")).await;
        assert_eq!(result.success().expect("should succeed").metadata.tokens_used, 0);
    }
}

#[tokio::test]
async fn test_ask_empty_text_falls_back_to_body() {
    let server = MockServer::start().await;
    let body = json!({
        "candidates": [{"content": {"parts": [{"text": ""}]}, "finishReason": "MAX_TOKENS"}],
        "usageMetadata": {"totalTokenCount": 12}
    });
    mount_success(&server, body.clone()).await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;

    let success = result.success().expect("should succeed");
    assert_eq!(success.data, body.to_string());
    assert_eq!(success.metadata.finish_reason, "MAX_TOKENS");
    assert_eq!(success.metadata.tokens_used, 12);
}

// ========== Failure paths ==========

#[tokio::test]
async fn test_ask_http_error_returns_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;

    assert_eq!(
        result,
        ApiResult::Failure(ErrorResponse {
            error: "quota exceeded".to_string(),
            code: 429,
        })
    );
    assert!(result.failure().unwrap().is_transport());

    let stats = client.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.successful_requests, 0);
}

#[tokio::test]
async fn test_ask_http_error_with_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;

    assert_eq!(
        result,
        ApiResult::Failure(ErrorResponse {
            error: "Request failed".to_string(),
            code: 500,
        })
    );
}

#[tokio::test]
async fn test_ask_malformed_json_is_unexpected_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;
    let client = make_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;

    let failure = result.failure().expect("should fail");
    assert_eq!(failure.code, -1);
    assert!(!failure.error.is_empty());
    assert!(!failure.is_transport());

    let stats = client.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.failed_requests, 1);
}

#[tokio::test]
async fn test_ask_network_failure_is_unexpected_failure() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = make_client(&uri);

    let result = client.ask(RequestOptions::new("Hello")).await;

    let failure = result.failure().expect("should fail");
    assert_eq!(failure.code, UNEXPECTED_FAILURE_CODE);
    assert!(!failure.error.contains(TEST_KEY));
    assert_eq!(client.stats().failed_requests, 1);
}

#[tokio::test]
async fn test_ask_timeout_is_unexpected_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let client = Client::new(
        ClientConfig::new(TEST_KEY)
            .base_url(server.uri())
            .timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let result = client.ask(RequestOptions::new("Hello")).await;

    assert_eq!(result.failure().map(|f| f.code), Some(-1));
    assert_eq!(client.stats().failed_requests, 1);
}

#[tokio::test]
async fn test_cancelled_ask_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let client = make_client(&server.uri());

    let outcome = tokio::time::timeout(
        Duration::from_millis(100),
        client.ask(RequestOptions::new("Hello")),
    )
    .await;
    assert!(outcome.is_err());

    let stats = client.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.successful_requests, 0);
}

// ========== Statistics ==========

#[tokio::test]
async fn test_each_ask_increments_exactly_one_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_success(&server, success_body()).await;
    let client = make_client(&server.uri());

    for expected_total in 1..=5_u64 {
        let before = client.stats();
        let result = client.ask(RequestOptions::new("Hello")).await;
        let after = client.stats();

        assert_eq!(after.total_requests, expected_total);
        assert_eq!(after.total_requests, before.total_requests + 1);
        if result.is_success() {
            assert_eq!(after.successful_requests, before.successful_requests + 1);
            assert_eq!(after.failed_requests, before.failed_requests);
        } else {
            assert_eq!(after.failed_requests, before.failed_requests + 1);
            assert_eq!(after.successful_requests, before.successful_requests);
        }
    }

    let stats = client.stats();
    assert_eq!(stats.failed_requests, 2);
    assert_eq!(stats.successful_requests, 3);
}

#[tokio::test]
async fn test_stats_snapshot_is_independent() {
    let server = MockServer::start().await;
    mount_success(&server, success_body()).await;
    let client = make_client(&server.uri());
    client.ask(RequestOptions::new("Hello")).await;

    let mut snapshot = client.stats();
    assert_eq!(snapshot, client.stats());
    snapshot.total_requests = 1000;
    snapshot.failed_requests = 7;

    let fresh = client.stats();
    assert_eq!(fresh.total_requests, 1);
    assert_eq!(fresh.failed_requests, 0);
}

#[tokio::test]
async fn test_reset_stats() {
    let server = MockServer::start().await;
    mount_success(&server, success_body()).await;
    let client = make_client(&server.uri());
    client.ask(RequestOptions::new("one")).await;
    client.ask(RequestOptions::new("two")).await;
    assert_eq!(client.stats().total_requests, 2);

    client.reset_stats();
    assert_eq!(client.stats(), Statistics::default());

    client.ask(RequestOptions::new("three")).await;
    let stats = client.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_requests, 1);
}

#[tokio::test]
async fn test_concurrent_asks_settle_consistently() {
    let server = MockServer::start().await;
    mount_success(&server, success_body()).await;
    let client = Arc::new(make_client(&server.uri()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.ask(RequestOptions::new(format!("q{i}"))).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }

    let stats = client.stats();
    assert_eq!(stats.total_requests, 16);
    assert_eq!(stats.successful_requests, 16);
    assert_eq!(stats.failed_requests, 0);
    assert_eq!(stats.in_flight(), 0);
}

// ========== Debug diagnostics ==========

fn make_debug_client(base_url: &str) -> Client {
    Client::new(ClientConfig::new(TEST_KEY).base_url(base_url).debug(true))
        .expect("client creation should succeed")
}

#[tokio::test]
#[traced_test]
async fn test_debug_logs_redacted_url_and_payload() {
    let server = MockServer::start().await;
    mount_success(&server, success_body()).await;
    let client = make_debug_client(&server.uri());

    assert!(client.ask(RequestOptions::new("Hello")).await.is_success());

    assert!(logs_contain("[GeminiClient] Request URL"));
    assert!(logs_contain(":generateContent?key=[REDACTED]"));
    assert!(logs_contain("[GeminiClient] Payload payload={"));
    assert!(logs_contain("[GeminiClient] Response data"));
    assert!(!logs_contain(TEST_KEY));
}

#[tokio::test]
#[traced_test]
async fn test_debug_logs_http_error_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .mount(&server)
        .await;
    let client = make_debug_client(&server.uri());

    assert!(client.ask(RequestOptions::new("Hello")).await.is_failure());

    assert!(logs_contain("[GeminiClient] HTTP Error"));
    assert!(logs_contain("status=503"));
    assert!(logs_contain("backend unavailable"));
}

#[tokio::test]
#[traced_test]
async fn test_debug_logs_unexpected_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;
    let client = make_debug_client(&server.uri());

    let result = client.ask(RequestOptions::new("Hello")).await;
    let failure = result.failure().expect("should fail");

    assert!(logs_contain("[GeminiClient] Error"));
    assert!(logs_contain(&failure.error));
}

#[tokio::test]
#[traced_test]
async fn test_no_diagnostics_without_debug() {
    let server = MockServer::start().await;
    mount_success(&server, success_body()).await;
    Mock::given(method("POST"))
        .and(path("/models/broken:generateContent"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;
    let client = make_client(&server.uri());
    let broken = Client::new(ClientConfig::new(TEST_KEY).base_url(server.uri()).model("broken"))
        .expect("client creation should succeed");

    assert!(client.ask(RequestOptions::new("Hello")).await.is_success());
    assert!(broken.ask(RequestOptions::new("Hello")).await.is_failure());

    assert!(!logs_contain("[GeminiClient]"));
}
