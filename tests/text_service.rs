use glossy::config::Config;
use glossy::llm::{CompletionRequest, OpenAiClient, ServiceError, TextService};
use serde_json::json;
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn client(server: &MockServer, key: &str) -> OpenAiClient {
    let base = Url::parse(&format!("{}/v1", server.uri())).unwrap();
    OpenAiClient::new(&base, key, "test-model").unwrap()
}

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest::new(prompt, 400, 0.9, Duration::from_secs(5))
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 400,
            "messages": [{ "role": "user", "content": "Перепиши это" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Готовый пост  ")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = client(&mock_server, "")
        .complete(request("Перепиши это"))
        .await
        .unwrap();

    assert_eq!(text, "Готовый пост");
}

#[tokio::test]
async fn test_complete_sends_bearer_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = client(&mock_server, "sk-test")
        .complete(request("ping"))
        .await
        .unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_complete_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, "")
        .complete(request("ping"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Http {
            status: 429,
            body: "rate limited".to_string()
        }
    );
}

#[tokio::test]
async fn test_complete_blank_content_is_empty_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, "")
        .complete(request("ping"))
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Empty);
}

#[tokio::test]
async fn test_complete_without_choices_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, "")
        .complete(request("ping"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Malformed(_)));
}

#[tokio::test]
async fn test_complete_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let request = CompletionRequest::new("ping", 10, 0.3, Duration::from_millis(200));
    let err = client(&mock_server, "").complete(request).await.unwrap_err();
    assert_eq!(err, ServiceError::Timeout);
}

#[test]
fn test_endpoint_joins_base_url() {
    let base = Url::parse("http://localhost:11434/v1/").unwrap();
    let client = OpenAiClient::new(&base, "", "llama3").unwrap();
    assert_eq!(
        client.endpoint().as_str(),
        "http://localhost:11434/v1/chat/completions"
    );
}

#[tokio::test]
async fn test_client_from_config_uses_configured_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = Url::parse(&format!("{}/v1", mock_server.uri())).unwrap();
    let config = Config::default().with_llm_api_url(base);
    let client = OpenAiClient::from_config(&config).unwrap();

    assert_eq!(client.complete(request("ping")).await.unwrap(), "ok");
}
