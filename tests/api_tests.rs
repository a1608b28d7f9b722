use chat_relay::config::Config;
use chat_relay::message::{ChatResponse, ErrorResponse};
use chat_relay::routes::create_router;
use chat_relay::services::{Responder, ResponderError};
use chat_relay::services::agent::LocalAgent;
use chat_relay::state::AppState;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

/// Replies with a fixed string for "Hello", otherwise echoes after a delay
/// that depends on the message, so concurrent calls finish out of order.
struct ScriptedResponder;

#[async_trait]
impl Responder for ScriptedResponder {
    async fn respond(&self, text: &str) -> Result<String, ResponderError> {
        if text == "Hello" {
            return Ok("Hi there!".to_string());
        }
        let delay = if text.starts_with("slow") { 50 } else { 5 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(format!("echo: {text}"))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct FailingResponder;

#[async_trait]
impl Responder for FailingResponder {
    async fn respond(&self, _text: &str) -> Result<String, ResponderError> {
        Err(ResponderError::Status {
            status: 403,
            body: "API key invalid: AIza-secret".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

fn app_with(responder: Arc<dyn Responder>) -> Router {
    create_router().with_state(Arc::new(AppState::new(responder)))
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_chat_endpoint_relays_reply() {
    let app = app_with(Arc::new(ScriptedResponder));

    let response = app.oneshot(chat_request(r#"{"message": "Hello"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let chat_resp: ChatResponse = read_json(response).await;
    assert_eq!(chat_resp.response, "Hi there!");
}

#[tokio::test]
async fn test_reply_is_not_altered() {
    let app = app_with(Arc::new(ScriptedResponder));

    let response = app
        .oneshot(chat_request(r#"{"message": "  spaced  out\n"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let chat_resp: ChatResponse = read_json(response).await;
    assert_eq!(chat_resp.response, "echo:   spaced  out\n");
}

#[tokio::test]
async fn test_missing_message_is_rejected() {
    let bodies = [
        r#"{}"#,
        r#"{"message": null}"#,
        r#"{"message": ""}"#,
        r#"{"message": "   "}"#,
    ];
    for body in bodies {
        let app = app_with(Arc::new(ScriptedResponder));
        let response = app.oneshot(chat_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: ErrorResponse = read_json(response).await;
        assert_eq!(err.error, "No message provided");
    }
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let app = app_with(Arc::new(ScriptedResponder));

    let response = app.clone().oneshot(chat_request("not json at all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = read_json(response).await;
    assert_eq!(err.error, "Invalid JSON body");

    // wrong type for message
    let response = app.clone().oneshot(chat_request(r#"{"message": 42}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // no content type
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .body(Body::from(r#"{"message": "Hello"}"#))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upstream_failure_is_502_without_details() {
    let app = app_with(Arc::new(FailingResponder));

    let response = app.oneshot(chat_request(r#"{"message": "Hello"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let err: ErrorResponse = read_json(response).await;
    assert_eq!(err.error, "Upstream responder failed");
    assert!(!err.error.contains("AIza"));
}

#[tokio::test]
async fn test_concurrent_requests_get_their_own_replies() {
    let app = app_with(Arc::new(ScriptedResponder));

    let slow = app.clone().oneshot(chat_request(r#"{"message": "slow one"}"#));
    let fast = app.oneshot(chat_request(r#"{"message": "fast one"}"#));
    let (slow, fast) = tokio::join!(slow, fast);

    let slow: ChatResponse = read_json(slow.unwrap()).await;
    let fast: ChatResponse = read_json(fast.unwrap()).await;
    assert_eq!(slow.response, "echo: slow one");
    assert_eq!(fast.response, "echo: fast one");
}

#[tokio::test]
async fn test_local_agent_behind_router() {
    let app = app_with(Arc::new(LocalAgent::new()));

    let response = app
        .oneshot(chat_request(r#"{"message": "flowers for a wedding"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let chat_resp: ChatResponse = read_json(response).await;
    assert!(chat_resp.response.contains("wedding"));
}

#[tokio::test]
async fn test_health() {
    let app = app_with(Arc::new(ScriptedResponder));

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_on_chat_is_not_allowed() {
    let app = app_with(Arc::new(ScriptedResponder));

    let req = Request::builder().uri("/chat").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

fn gemini_app(base_url: String) -> Router {
    let config = Config::from_lookup(|key| match key {
        "CHAT_RELAY_RESPONDER" => Some("gemini".to_string()),
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        "GEMINI_MODEL" => Some("gemini-test".to_string()),
        "GEMINI_BASE_URL" => Some(base_url.clone()),
        _ => None,
    })
    .unwrap();
    let state = AppState::from_config(&config).unwrap();
    assert_eq!(state.responder.name(), "gemini");
    create_router().with_state(Arc::new(state))
}

#[tokio::test]
async fn test_gemini_responder_through_router() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-test:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Fresh tulips!"}]}}]}"#)
        .create_async()
        .await;

    let app = gemini_app(server.url());
    let response = app.oneshot(chat_request(r#"{"message": "Hello"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let chat_resp: ChatResponse = read_json(response).await;
    assert_eq!(chat_resp.response, "Fresh tulips!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_failure_through_router_is_502() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", mockito::Matcher::Any)
        .with_status(500)
        .with_body("backend exploded")
        .create_async()
        .await;

    let app = gemini_app(server.url());
    let response = app.oneshot(chat_request(r#"{"message": "Hello"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let err: ErrorResponse = read_json(response).await;
    assert_eq!(err.error, "Upstream responder failed");
}

#[tokio::test]
async fn test_unreachable_gemini_is_502() {
    let app = gemini_app("http://127.0.0.1:1".to_string());
    let response = app.oneshot(chat_request(r#"{"message": "Hello"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
