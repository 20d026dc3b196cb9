use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use hub_core::Result;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/news", get(handlers::list_news))
        .route("/api/topics", get(handlers::trending_topics))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/resources", get(handlers::list_resources))
        .route("/api/learning-path", post(handlers::learning_path))
        .route("/api/questions", get(handlers::list_questions).post(handlers::create_question))
        .route("/api/questions/stream", get(handlers::stream_questions))
        .route("/api/questions/:id/answers", post(handlers::create_answer))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!("🚀 Hub API listening on http://{}", local);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use super::{create_app, serve, ApiError, AppState};
    pub use hub_core::Result;
}
