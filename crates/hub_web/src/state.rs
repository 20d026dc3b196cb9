use std::sync::Arc;

use hub_core::{CompletionModel, QuestionStore};
use hub_inference::{LearningPathGenerator, Summarizer, TopicExtractor};
use hub_news::NewsClient;

/// Shared handles, built once at startup and injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn CompletionModel>,
    pub news: Arc<NewsClient>,
    pub store: Arc<dyn QuestionStore>,
}

impl AppState {
    pub fn new(model: Arc<dyn CompletionModel>, news: NewsClient, store: Arc<dyn QuestionStore>) -> Self {
        Self {
            model,
            news: Arc::new(news),
            store,
        }
    }

    pub fn summarizer(&self) -> Summarizer {
        Summarizer::new(self.model.clone())
    }

    pub fn topics(&self) -> TopicExtractor {
        TopicExtractor::new(self.model.clone())
    }

    pub fn learning_paths(&self) -> LearningPathGenerator {
        LearningPathGenerator::new(self.model.clone())
    }
}
