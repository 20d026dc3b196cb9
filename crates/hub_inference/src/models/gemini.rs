use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use hub_core::config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GEMINI_API_KEY_VAR};
use hub_core::{CompletionModel, Error, GatewayError, HubConfig, ResponseSchema, Result};

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, schema: Option<ResponseSchema>) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: schema.map(|s| GenerationConfig {
                response_mime_type: s.mime_type(),
                response_schema: s.to_json(),
            }),
        }
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a generateContent body.
pub fn extract_text(body: &str) -> std::result::Result<String, GatewayError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::Malformed(format!("response is not JSON: {}", e)))?;

    value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            GatewayError::Malformed("missing candidates[0].content.parts[0].text".to_string())
        })
}

pub struct GeminiModel {
    client: Arc<Client>,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(config.gemini_api_key.clone())
            .with_model(&config.gemini_model)
            .with_base_url(&config.gemini_base_url)
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, api_key: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        ))
        .map_err(|e| Error::External(anyhow!("Invalid Gemini endpoint {}: {}", self.base_url, e)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl CompletionModel for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn complete(&self, prompt: &str, schema: Option<ResponseSchema>) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput("prompt must not be empty".to_string()));
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::missing(&format!("Gemini API key ({})", GEMINI_API_KEY_VAR)))?;

        let request = GenerateRequest::new(prompt, schema);
        tracing::debug!(model = %self.model, json = schema.is_some(), "sending completion request");

        let response = self
            .client
            .post(self.endpoint(api_key)?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "completion request failed");
            return Err(GatewayError::Status(status.as_u16()).into());
        }

        let body = response.text().await?;
        Ok(extract_text(&body)?)
    }
}
