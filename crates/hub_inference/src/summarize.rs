use std::sync::Arc;

use hub_core::{Article, CompletionModel, GatewayError, Result};

use crate::prompts::summarize_prompt;

pub struct Summarizer {
    model: Arc<dyn CompletionModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// One-sentence summary of a single article.
    pub async fn summarize(&self, article: &Article) -> Result<String> {
        self.summarize_headline(&article.title, &article.snippet).await
    }

    pub async fn summarize_headline(&self, title: &str, snippet: &str) -> Result<String> {
        tracing::info!("🤖 Generating summary for article: {}", title);
        let summary = self.model.complete(&summarize_prompt(title, snippet), None).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(GatewayError::Malformed("empty summary".to_string()).into());
        }
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DummyModel, DummyReply};
    use hub_core::ErrorKind;
    use std::collections::BTreeSet;

    fn article() -> Article {
        Article {
            id: "a1".to_string(),
            title: "Humanoid robot folds laundry".to_string(),
            snippet: "A lab demo shows dexterous manipulation.".to_string(),
            source: "lab".to_string(),
            date: "2024-01-01".to_string(),
            published_at: None,
            url: "https://example.com/a1".to_string(),
            tags: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn test_summary_is_trimmed() {
        let model = Arc::new(DummyModel::with_reply(DummyReply::Text("  Robots fold laundry now.\n".to_string())));
        let summary = Summarizer::new(model).summarize(&article()).await.unwrap();
        assert_eq!(summary, "Robots fold laundry now.");
    }

    #[tokio::test]
    async fn test_blank_summary_is_malformed() {
        let model = Arc::new(DummyModel::with_reply(DummyReply::Text("   ".to_string())));
        let err = Summarizer::new(model).summarize(&article()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_configuration_error() {
        let model = Arc::new(DummyModel::with_reply(DummyReply::Unconfigured));
        let err = Summarizer::new(model).summarize(&article()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
