pub mod learning_path;
pub mod markup;
pub mod models;
pub mod prompts;
pub mod summarize;
pub mod topics;

pub use learning_path::{LearningPath, LearningPathGenerator};
pub use models::create_model;
pub use summarize::Summarizer;
pub use topics::{TopicExtractor, FALLBACK_TOPICS};

pub mod prelude {
    pub use super::models::{create_model, DummyModel, GeminiModel};
    pub use super::{LearningPath, LearningPathGenerator, Summarizer, TopicExtractor};
    pub use hub_core::{CompletionModel, Error, ResponseSchema, Result};
}
