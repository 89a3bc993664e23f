use aria_types::find_persona;
use aria_voice::{FeatherlessRewriter, PassthroughRewriter, PersonaRewriter, RewriteConfig};
use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn rewriter(endpoint: String, timeout_ms: u64) -> FeatherlessRewriter {
    FeatherlessRewriter::new(RewriteConfig {
        enabled: true,
        api_key: "fl-key".to_string(),
        endpoint,
        timeout_ms,
        ..Default::default()
    })
}

#[tokio::test]
async fn test_rewrite_returns_completion() {
    let captured: Captured = Arc::default();
    let router = Router::new()
        .route(
            "/chat/completions",
            post(
                |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    captured.lock().unwrap().push((auth, body));
                    Json(json!({
                        "choices": [{"message": {"content": "  And THAT, folks, is the news!  "}}]
                    }))
                },
            ),
        )
        .with_state(captured.clone());
    let endpoint = spawn_stub(router).await;
    let persona = find_persona("radio_host").unwrap();

    let rewritten = rewriter(endpoint, 5_000).rewrite("that is the news", persona).await;
    assert_eq!(rewritten, "And THAT, folks, is the news!");

    let requests = captured.lock().unwrap();
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer fl-key"));
    assert_eq!(body["model"], "meta-llama/Meta-Llama-3.1-8B-Instruct");
    assert_eq!(body["max_tokens"], 300);
    assert_eq!(body["messages"][0]["role"], "system");
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Persona: Radio Host"));
    assert!(user.contains("Original: that is the news"));
}

#[tokio::test]
async fn test_rewrite_falls_back_on_provider_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "overloaded") }),
    );
    let endpoint = spawn_stub(router).await;
    let persona = find_persona("playful_kid").unwrap();

    let rewritten = rewriter(endpoint, 5_000).rewrite("hello", persona).await;
    assert_eq!(rewritten, "hello");
}

#[tokio::test]
async fn test_rewrite_falls_back_on_empty_completion() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({"choices": [{"message": {"content": "   "}}]})) }),
    );
    let endpoint = spawn_stub(router).await;
    let persona = find_persona("playful_kid").unwrap();

    let rewritten = rewriter(endpoint, 5_000).rewrite("hello", persona).await;
    assert_eq!(rewritten, "hello");
}

#[tokio::test]
async fn test_rewrite_falls_back_on_timeout() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"choices": [{"message": {"content": "too late"}}]}))
        }),
    );
    let endpoint = spawn_stub(router).await;
    let persona = find_persona("elder_storyteller").unwrap();

    let rewritten = rewriter(endpoint, 100).rewrite("hello", persona).await;
    assert_eq!(rewritten, "hello");
}

#[tokio::test]
async fn test_rewrite_without_api_key_is_passthrough() {
    let service = FeatherlessRewriter::new(RewriteConfig {
        enabled: true,
        endpoint: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    });
    let persona = find_persona("calm_narrator").unwrap();
    assert_eq!(service.rewrite("keep me", persona).await, "keep me");
}

#[tokio::test]
async fn test_blank_text_is_not_sent() {
    let persona = find_persona("calm_narrator").unwrap();
    let rewritten = rewriter("http://127.0.0.1:9".to_string(), 100)
        .rewrite("   ", persona)
        .await;
    assert_eq!(rewritten, "   ");
}

#[tokio::test]
async fn test_passthrough_returns_input() {
    let persona = find_persona("calm_narrator").unwrap();
    assert_eq!(PassthroughRewriter.rewrite("same", persona).await, "same");
}
