use std::sync::Arc;

use hub_core::{Article, CompletionModel, Error, ResponseSchema, Result};

use crate::prompts::topics_prompt;

pub const MAX_TOPICS: usize = 6;

/// Shown whenever the model cannot produce a usable topic list.
pub const FALLBACK_TOPICS: [&str; MAX_TOPICS] = [
    "AGI",
    "Reinforcement Learning",
    "Humanoid Robots",
    "Generative AI",
    "Neural Networks",
    "SLAM",
];

pub fn fallback_topics() -> Vec<String> {
    FALLBACK_TOPICS.iter().map(|t| t.to_string()).collect()
}

/// Accept only a non-empty JSON array of non-blank strings, capped at six.
pub fn parse_topics(raw: &str) -> Result<Vec<String>> {
    let topics: Vec<String> = serde_json::from_str(raw.trim())
        .map_err(|e| Error::Schema(format!("topics are not a JSON array of strings: {}", e)))?;

    if topics.is_empty() {
        return Err(Error::Schema("topic list is empty".to_string()));
    }
    if topics.iter().any(|t| t.trim().is_empty()) {
        return Err(Error::Schema("topic list contains a blank entry".to_string()));
    }

    Ok(topics
        .into_iter()
        .map(|t| t.trim().to_string())
        .take(MAX_TOPICS)
        .collect())
}

pub struct TopicExtractor {
    model: Arc<dyn CompletionModel>,
}

impl TopicExtractor {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Trending topics for the dashboard. Never fails and never returns an empty list.
    pub async fn extract_topics(&self, articles: &[Article]) -> Vec<String> {
        if articles.is_empty() {
            tracing::debug!("no articles to analyze, using fallback topics");
            return fallback_topics();
        }
        match self.try_extract(articles).await {
            Ok(topics) => topics,
            Err(e) => {
                tracing::warn!("Failed to fetch dynamic trending topics: {}", e);
                fallback_topics()
            }
        }
    }

    pub async fn try_extract(&self, articles: &[Article]) -> Result<Vec<String>> {
        let prompt = topics_prompt(articles);
        let raw = self
            .model
            .complete(&prompt, Some(ResponseSchema::StringArray))
            .await?;
        parse_topics(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topics_caps_at_six() {
        let raw = r#"["a","b","c","d","e","f","g"]"#;
        assert_eq!(parse_topics(raw).unwrap(), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_parse_topics_trims() {
        assert_eq!(parse_topics(" [\" Edge AI \"] ").unwrap(), vec!["Edge AI"]);
    }

    #[test]
    fn test_parse_topics_rejects_bad_shapes() {
        assert!(parse_topics("AGI, SLAM").is_err());
        assert!(parse_topics("[]").is_err());
        assert!(parse_topics(r#"["AGI", 3]"#).is_err());
        assert!(parse_topics(r#"{"topics":["AGI"]}"#).is_err());
        assert!(parse_topics(r#"["AGI", "  "]"#).is_err());
    }

    #[test]
    fn test_fallback_has_six_entries() {
        let fallback = fallback_topics();
        assert_eq!(fallback.len(), 6);
        assert_eq!(fallback[0], "AGI");
        assert_eq!(fallback[5], "SLAM");
    }
}
