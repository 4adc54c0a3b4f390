//! End-to-end flow through the router against a mocked inference endpoint.
//!
//! The gateway resolves its configuration from the environment at call
//! time, so this file contains a single test that pins the OLLAMA_* vars
//! once. It is a separate test binary and therefore a separate process;
//! the other test binaries never see these vars.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID_REPORT: &str = r#"{"error_type":"TypeError-call-nonfunction","root_cause":["handler is undefined"],"fix_suggestions":["check the export"],"prevention":["add a type check"]}"#;

const EXTRACTION: &str = r#"{"language_guess":"ts","top_error_line":"TypeError: handler is not a function","error_text":"TypeError: handler is not a function","stack_trace_lines":[],"code_blocks":[],"logs":[],"file_paths":[],"environment_hints":{},"user_intent":"","confidence":0.7}"#;

fn chat_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "message": {"role": "assistant", "content": content},
        "done": true
    })
}

async fn post_json(uri: &str, body: serde_json::Value) -> axum::response::Response {
    copilot_api::router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("response")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_parse_and_debug_flow() {
    let mock_server = MockServer::start().await;

    std::env::set_var("OLLAMA_BASE_URL", mock_server.uri());
    std::env::set_var("OLLAMA_MODE", "chat");
    std::env::set_var("OLLAMA_MODEL", "test-model");
    std::env::set_var("OLLAMA_TIMEOUT", "5");

    // --- /parse ---
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(EXTRACTION)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let response = post_json(
        "/parse",
        serde_json::json!({"raw_input": "TypeError: handler is not a function"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["parsed"]["language_guess"], "ts");
    assert_eq!(body["raw_model_output"], EXTRACTION);
    let parsed = body["parsed"].clone();

    // --- /debug, first model answer malformed, retry conformant ---
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_response("let me think about it")),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let fenced = format!("```json\n{VALID_REPORT}\n```");
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(&fenced)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let response = post_json(
        "/debug",
        serde_json::json!({
            "raw_input": "TypeError: handler is not a function",
            "parsed": parsed,
            "similar_bugs": null
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["error_type"], "TypeError-call-nonfunction");
    assert_eq!(body["root_cause"], serde_json::json!(["handler is undefined"]));
    assert_eq!(body["fix_suggestions"], serde_json::json!(["check the export"]));
    assert_eq!(body["prevention"], serde_json::json!(["add a type check"]));
    // The accepted attempt was the retry; its raw (fenced) text comes back.
    assert_eq!(body["raw_model_output"], fenced);

    // --- /debug, upstream failure maps to 502 ---
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&mock_server)
        .await;

    let response = post_json(
        "/debug",
        serde_json::json!({"raw_input": "boom", "parsed": {}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert!(
        body["detail"]
            .as_str()
            .is_some_and(|d| d.contains("status 500")),
        "detail should carry the upstream status: {body}"
    );
}
