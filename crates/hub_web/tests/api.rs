use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use hub_core::{CompletionModel, GatewayError, QuestionStore};
use hub_inference::models::{DummyModel, DummyReply};
use hub_inference::FALLBACK_TOPICS;
use hub_news::NewsClient;
use hub_storage::MemoryStore;
use hub_web::{create_app, AppState};

async fn news_stub() -> String {
    let router = Router::new().route(
        "/news",
        get(|| async {
            Json(json!({
                "status": "success",
                "results": [
                    { "article_id": "1", "title": "Robot dogs", "description": "legged robotics", "link": "https://a", "source_id": "A" },
                    { "article_id": "2", "title": "Chip shortage", "description": "new GPU supply", "link": "https://b", "source_id": "B" },
                    { "article_id": "3", "title": "LLM agents", "description": "agents at work", "link": "https://c", "source_id": "C" },
                    { "article_id": "4", "title": "Bias audits", "description": "ethics of models", "link": "https://d", "source_id": "D" },
                    { "article_id": "5", "title": "Drone swarms", "description": "more robots", "link": "https://e", "source_id": "E" }
                ]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn state_with(model: Arc<dyn CompletionModel>, news: NewsClient) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new("questions"));
    (AppState::new(model, news, store.clone()), store)
}

fn offline_state() -> (AppState, Arc<MemoryStore>) {
    state_with(Arc::new(DummyModel::new()), NewsClient::new(None))
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_news_filter() {
    let base = news_stub().await;
    let news = NewsClient::new(Some("k".to_string())).with_base_url(&base);
    let (state, _) = state_with(Arc::new(DummyModel::new()), news);

    let (status, body) = send(state, get_request("/api/news?filter=Robotics")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["1", "5"]);
}

#[tokio::test]
async fn test_unknown_filter_is_bad_request() {
    let (state, _) = offline_state();
    let (status, body) = send(state, get_request("/api/news?filter=Quantum")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_missing_news_key_is_unavailable() {
    let (state, _) = offline_state();
    let (status, body) = send(state, get_request("/api/news")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "configuration");
}

#[tokio::test]
async fn test_dashboard_limits_articles_and_extracts_topics() {
    let base = news_stub().await;
    let news = NewsClient::new(Some("k".to_string())).with_base_url(&base);
    let (state, _) = state_with(Arc::new(DummyModel::new()), news);

    let (status, body) = send(state, get_request("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["articles"].as_array().unwrap().len(), 4);
    assert!(body["news_error"].is_null());
    assert_eq!(
        body["topics"],
        json!(["Robot dogs", "Chip shortage", "LLM agents", "Bias audits", "Drone swarms"])
    );
}

#[tokio::test]
async fn test_dashboard_without_news_uses_fallback_topics() {
    let model = Arc::new(DummyModel::new());
    let (state, _) = state_with(model.clone(), NewsClient::new(None));

    let (status, body) = send(state, get_request("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["articles"].as_array().unwrap().is_empty());
    assert!(body["news_error"].as_str().unwrap().contains("NewsData.io API key"));
    assert_eq!(body["topics"], json!(FALLBACK_TOPICS));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_topics_fall_back_on_gateway_failure() {
    let base = news_stub().await;
    let news = NewsClient::new(Some("k".to_string())).with_base_url(&base);
    let model = Arc::new(DummyModel::with_reply(DummyReply::Fail(GatewayError::Status(500))));
    let (state, _) = state_with(model, news);

    let (status, body) = send(state, get_request("/api/topics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"], json!(FALLBACK_TOPICS));
}

#[tokio::test]
async fn test_summarize() {
    let model = Arc::new(DummyModel::with_reply(DummyReply::Text(" Robots learn to walk. ".to_string())));
    let (state, _) = state_with(model, NewsClient::new(None));

    let (status, body) = send(
        state,
        post_json("/api/summarize", json!({ "title": "Robot dogs", "snippet": "legged robotics" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Robots learn to walk.");
}

#[tokio::test]
async fn test_summarize_gateway_failure_is_bad_gateway() {
    let model = Arc::new(DummyModel::with_reply(DummyReply::Fail(GatewayError::Status(500))));
    let (state, _) = state_with(model, NewsClient::new(None));

    let (status, body) = send(state, post_json("/api/summarize", json!({ "title": "Robot dogs" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Gateway error: API call failed with status: 500");
}

#[tokio::test]
async fn test_resources_catalog() {
    let (state, _) = offline_state();
    let (status, body) = send(state, get_request("/api/resources")).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body.as_array().unwrap();
    assert_eq!(categories[0]["name"], "Core AI & Machine Learning");
    assert_eq!(categories[0]["resources"][0]["type"], "Online Course");
}

#[tokio::test]
async fn test_learning_path_renders_html() {
    let model = Arc::new(DummyModel::with_reply(DummyReply::Text(
        "# Vision Track\n1. Start with **CS231n**".to_string(),
    )));
    let (state, _) = state_with(model, NewsClient::new(None));

    let (status, body) = send(state, post_json("/api/learning-path", json!({ "goal": "computer vision" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "computer vision");
    assert!(body["html"].as_str().unwrap().contains("<h1>Vision Track</h1>"));
    assert!(body["html"].as_str().unwrap().contains("<strong>CS231n</strong>"));
}

#[tokio::test]
async fn test_blank_goal_is_rejected() {
    let model = Arc::new(DummyModel::new());
    let (state, _) = state_with(model.clone(), NewsClient::new(None));

    let (status, _) = send(state, post_json("/api/learning-path", json!({ "goal": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_question_and_answer_flow() {
    let (state, store) = offline_state();

    let (status, question) = send(state.clone(), post_json("/api/questions", json!({ "text": "Which IMU?" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = question["id"].as_str().unwrap().to_string();

    let (status, answer) = send(
        state.clone(),
        post_json(&format!("/api/questions/{}/answers", id), json!({ "text": " BMI088 " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(answer["text"], "BMI088");

    let (status, listed) = send(state, get_request("/api/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["answers"][0]["text"], "BMI088");
    assert_eq!(store.snapshot().await.unwrap()[0].answers.len(), 1);
}

#[tokio::test]
async fn test_answer_to_unknown_question() {
    let (state, _) = offline_state();
    let (status, body) = send(state, post_json("/api/questions/missing/answers", json!({ "text": "hi" }))).await;
    assert_eq!(status, StatusCode::FAILED_DEPENDENCY);
    assert_eq!(body["kind"], "store");
}

#[tokio::test]
async fn test_question_stream_emits_snapshots() {
    let (state, store) = offline_state();
    let response = create_app(state).oneshot(get_request("/api/questions/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body().into_data_stream();
    let mut seen = String::new();

    let first = tokio::time::timeout(Duration::from_secs(2), body.next()).await.unwrap().unwrap().unwrap();
    seen.push_str(&String::from_utf8_lossy(&first));
    assert!(seen.contains("event: snapshot"));
    assert!(seen.contains("data: []"));

    store.create_question("Streaming?").await.unwrap();
    while !seen.contains("Streaming?") {
        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next()).await.unwrap().unwrap().unwrap();
        seen.push_str(&String::from_utf8_lossy(&chunk));
    }
    assert_eq!(store.subscriber_count(), 1);

    drop(body);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.subscriber_count(), 0);
}

#[tokio::test]
async fn test_slow_stream_reader_gets_latest_snapshot_only() {
    let (state, store) = offline_state();
    let response = create_app(state).oneshot(get_request("/api/questions/stream")).await.unwrap();
    let mut body = response.into_body().into_data_stream();

    tokio::time::sleep(Duration::from_millis(20)).await;
    for i in 0..5 {
        store.create_question(&format!("Backlog {}?", i)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let chunk = tokio::time::timeout(Duration::from_secs(2), body.next()).await.unwrap().unwrap().unwrap();
    let text = String::from_utf8_lossy(&chunk).to_string();
    assert!(text.contains("Backlog 4?"));
    assert!(text.contains("Backlog 0?"));
    assert!(!text.contains("data: []"));

    assert!(tokio::time::timeout(Duration::from_millis(100), body.next()).await.is_err());
}
