use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use hub_core::resources::{self, ResourceCategory};
use hub_core::{Answer, Article, Error, Question, TagFilter};
use hub_inference::LearningPath;

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Articles shown on the dashboard.
pub const DASHBOARD_ARTICLES: usize = 4;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub articles: Vec<Article>,
    pub news_error: Option<String>,
    pub topics: Vec<String>,
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Json<Vec<Article>>> {
    let filter: TagFilter = match query.filter.as_deref() {
        Some(raw) => raw.parse()?,
        None => TagFilter::All,
    };
    let articles = state.news.fetch_articles().await?;
    Ok(Json(filter.apply(&articles).into_iter().cloned().collect()))
}

pub async fn trending_topics(State(state): State<Arc<AppState>>) -> Json<TopicsResponse> {
    let articles = state.news.fetch_articles().await.unwrap_or_else(|e| {
        tracing::warn!("News unavailable for topic extraction: {}", e);
        Vec::new()
    });
    let topics = state.topics().extract_topics(&articles).await;
    Json(TopicsResponse { topics })
}

/// News failures are reported in the body; topics always come back.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<Dashboard> {
    let (articles, news_error) = match state.news.fetch_articles().await {
        Ok(articles) => (articles, None),
        Err(e) => {
            tracing::error!("Failed to load news for dashboard: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    };
    let topics = state.topics().extract_topics(&articles).await;
    Json(Dashboard {
        articles: articles.into_iter().take(DASHBOARD_ARTICLES).collect(),
        news_error,
        topics,
    })
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> ApiResult<Json<SummaryResponse>> {
    if request.title.trim().is_empty() {
        return Err(Error::InvalidInput("title must not be empty".to_string()).into());
    }
    let summary = state
        .summarizer()
        .summarize_headline(&request.title, &request.snippet)
        .await?;
    Ok(Json(SummaryResponse { summary }))
}

pub async fn list_resources() -> Json<&'static [ResourceCategory]> {
    Json(resources::catalog())
}

pub async fn learning_path(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GoalRequest>,
) -> ApiResult<Json<LearningPath>> {
    let path = state.learning_paths().generate(&request.goal).await?;
    Ok(Json(path))
}

pub async fn list_questions(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Question>>> {
    Ok(Json(state.store.snapshot().await?))
}

pub async fn create_question(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> ApiResult<impl IntoResponse> {
    let question = state.store.create_question(&request.text).await?;
    tracing::info!("❓ Question posted: {}", question.id);
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn create_answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<TextRequest>,
) -> ApiResult<impl IntoResponse> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(Error::InvalidInput("answer text must not be empty".to_string()).into());
    }
    let answer = Answer::new(text);
    state.store.append_answer(&id, &answer).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

/// Server-sent `snapshot` events, one per store update. A slow client only
/// ever sees the latest snapshot. The store subscription lives as long as
/// the response stream.
pub async fn stream_questions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let (tx, rx) = watch::channel::<Option<Vec<Question>>>(None);
    let subscription = state.store.subscribe(Box::new(move |snapshot: Vec<Question>| {
        tx.send_replace(Some(snapshot));
    }))?;
    tracing::debug!("snapshot stream opened");

    let events = stream::unfold((rx, subscription), |(mut rx, subscription)| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone().unwrap_or_default();
        let event = Event::default()
            .event("snapshot")
            .json_data(&snapshot)
            .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
        Some((Ok(event), (rx, subscription)))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
