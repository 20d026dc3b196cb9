use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use hub_core::config::{DEFAULT_NEWSDATA_BASE_URL, NEWSDATA_API_KEY_VAR};
use hub_core::{Article, Error, HubConfig, Result};

use crate::tagging::derive_tags;

pub const NEWS_QUERY: &str = "\"artificial intelligence\" OR \"robotics\"";
const SERVICE: &str = "NewsData.io";

#[derive(Debug, Deserialize)]
struct RawArticle {
    article_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    link: Option<String>,
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl RawArticle {
    fn normalize(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let link = self.link.filter(|l| !l.trim().is_empty())?;
        let tags = derive_tags(&title, self.description.as_deref());

        let published_at = self.pub_date.as_deref().and_then(parse_pub_date);
        let date = match (&published_at, &self.pub_date) {
            (Some(dt), _) => dt.format("%Y-%m-%d").to_string(),
            (None, Some(raw)) => raw.clone(),
            (None, None) => String::new(),
        };

        Some(Article {
            id: self.article_id.unwrap_or_else(|| link.clone()),
            snippet: self
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "No description available.".to_string()),
            source: self.source_id.unwrap_or_else(|| "Unknown Source".to_string()),
            title,
            date,
            published_at,
            url: link,
            tags,
        })
    }
}

/// Turn a NewsData.io response body into display records.
pub fn parse_response(body: &str) -> Result<Vec<Article>> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| Error::Schema(format!("{} response is not JSON: {}", SERVICE, e)))?;

    let status = envelope.get("status").and_then(Value::as_str);
    let results = envelope.get("results");

    match (status, results) {
        (Some("success"), Some(Value::Array(items))) => {
            let mut articles = Vec::with_capacity(items.len());
            for item in items {
                let raw: RawArticle = serde_json::from_value(item.clone())
                    .map_err(|e| Error::Schema(format!("Unexpected article shape: {}", e)))?;
                match raw.normalize() {
                    Some(article) => articles.push(article),
                    None => tracing::warn!("Skipping article without title or link"),
                }
            }
            Ok(articles)
        }
        _ => {
            let message = results
                .and_then(|r| r.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("Failed to fetch news from NewsData.io");
            Err(Error::Schema(message.to_string()))
        }
    }
}

pub struct NewsClient {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
}

impl NewsClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: DEFAULT_NEWSDATA_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(config.newsdata_api_key.clone()).with_base_url(&config.newsdata_base_url)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, api_key: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/news", self.base_url),
            &[("apikey", api_key), ("q", NEWS_QUERY), ("language", "en")],
        )
        .map_err(|e| Error::External(anyhow!("Invalid NewsData endpoint {}: {}", self.base_url, e)))
    }

    /// Fetch and normalize the latest AI/robotics headlines. One attempt.
    pub async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::missing(&format!("NewsData.io API key ({})", NEWSDATA_API_KEY_VAR)))?;

        tracing::info!("📰 Fetching news from {}", SERVICE);
        let response = self.client.get(self.endpoint(api_key)?).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let articles = parse_response(&body)?;
        tracing::info!("✨ Found {} articles", articles.len());
        Ok(articles)
    }
}

impl fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::{ErrorKind, Tag};
    use std::collections::BTreeSet;

    #[test]
    fn test_scenario_robot_arm() {
        let body = r#"{"status":"success","results":[{"title":"New Robot Arm Ethics Debate","description":"bias in robotics","link":"https://x","pubDate":"2024-01-01","source_id":"X"}]}"#;
        let articles = parse_response(body).unwrap();
        assert_eq!(articles.len(), 1);

        let article = &articles[0];
        assert_eq!(article.tags, BTreeSet::from([Tag::Robotics, Tag::Ethics]));
        assert_eq!(article.id, "https://x");
        assert_eq!(article.url, "https://x");
        assert_eq!(article.source, "X");
        assert_eq!(article.date, "2024-01-01");
        assert_eq!(article.snippet, "bias in robotics");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let body = r#"{"status":"success","results":[{"article_id":"abc","title":"Chip news","description":null,"link":"https://y","pubDate":"2024-03-05 10:20:30","source_id":null}]}"#;
        let article = &parse_response(body).unwrap()[0];
        assert_eq!(article.id, "abc");
        assert_eq!(article.snippet, "No description available.");
        assert_eq!(article.source, "Unknown Source");
        assert_eq!(article.date, "2024-03-05");
        assert!(article.published_at.is_some());
    }

    #[test]
    fn test_unparsable_date_is_kept_verbatim() {
        let body = r#"{"status":"success","results":[{"title":"t","link":"https://z","pubDate":"yesterday"}]}"#;
        let article = &parse_response(body).unwrap()[0];
        assert_eq!(article.date, "yesterday");
        assert!(article.published_at.is_none());
    }

    #[test]
    fn test_skips_articles_without_link() {
        let body = r#"{"status":"success","results":[{"title":"no link"},{"title":"ok","link":"https://ok"}]}"#;
        let articles = parse_response(body).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "ok");
    }

    #[test]
    fn test_error_envelope_is_schema_error() {
        let body = r#"{"status":"error","results":{"message":"API key invalid","code":"Unauthorized"}}"#;
        let err = parse_response(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.to_string(), "Schema error: API key invalid");

        assert_eq!(parse_response("<html>").unwrap_err().kind(), ErrorKind::Schema);
        assert_eq!(parse_response(r#"{"status":"success"}"#).unwrap_err().kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_endpoint_query() {
        let client = NewsClient::new(None).with_base_url("https://newsdata.io/api/1/");
        let url = client.endpoint("k").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(url.path(), "/api/1/news");
        assert!(pairs.contains(&("apikey".to_string(), "k".to_string())));
        assert!(pairs.contains(&("q".to_string(), NEWS_QUERY.to_string())));
        assert!(pairs.contains(&("language".to_string(), "en".to_string())));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let err = NewsClient::new(None).fetch_articles().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
