//! Integration tests for the generation client's HTTP contract.

use reqwest::Client;
use serde_json::json;
use syrin_humanizer::{GenerationClient, GenerationError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GenerationClient {
    GenerationClient::new(Client::new(), &server.address().to_string(), "test-model")
}

#[tokio::test]
async fn generate_returns_humanized_text_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "test-model", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Alert: prod-1 unstable..."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .generate("disk full on [prod-1]", "Rewrite this error:")
        .await;

    assert_eq!(result.unwrap(), "Alert: prod-1 unstable...");
}

#[tokio::test]
async fn generate_sends_prompt_and_text_concatenated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "prompt": "Rewrite this error: disk full on [prod-1]"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .generate("disk full on [prod-1]", "Rewrite this error:")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn generate_fails_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.generate("boom", "prompt").await;

    match result {
        Err(GenerationError::Status(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_fails_on_missing_response_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.generate("boom", "prompt").await;

    assert!(matches!(result, Err(GenerationError::MissingResponse)));
}

#[tokio::test]
async fn generate_fails_when_service_unreachable() {
    // Nothing listens on this address.
    let client = GenerationClient::new(Client::new(), "127.0.0.1:1", "test-model");
    let result = client.generate("boom", "prompt").await;

    assert!(matches!(result, Err(GenerationError::Transport(_))));
}
