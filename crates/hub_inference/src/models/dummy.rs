use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use hub_core::{CompletionModel, Error, GatewayError, ResponseSchema, Result};

/// Labels the prompts put in front of the data they carry.
const PAYLOAD_LABELS: [&str; 3] = ["Headlines:", "Snippet:", "Available Resources:"];

/// What the dummy model answers with.
#[derive(Debug, Clone)]
pub enum DummyReply {
    /// Offline canned output derived from the prompt.
    Canned,
    Text(String),
    Fail(GatewayError),
    Unconfigured,
}

/// Offline stand-in for the completion endpoint.
pub struct DummyModel {
    reply: DummyReply,
    calls: AtomicUsize,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("reply", &self.reply)
            .field("calls", &self.calls())
            .finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::with_reply(DummyReply::Canned)
    }

    pub fn with_reply(reply: DummyReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Text following the first known label, or the whole prompt.
    fn payload(prompt: &str) -> &str {
        PAYLOAD_LABELS
            .iter()
            .find_map(|label| prompt.split_once(label).map(|(_, rest)| rest))
            .unwrap_or(prompt)
            .trim()
    }

    fn canned(prompt: &str, schema: Option<ResponseSchema>) -> String {
        let payload = Self::payload(prompt);
        match schema {
            Some(ResponseSchema::StringArray) => {
                let items: Vec<&str> = payload
                    .split(", ")
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .take(6)
                    .collect();
                serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
            }
            None => {
                let words: Vec<&str> = payload.split_whitespace().take(20).collect();
                words.join(" ")
            }
        }
    }
}

#[async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str, schema: Option<ResponseSchema>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput("prompt must not be empty".to_string()));
        }
        match &self.reply {
            DummyReply::Canned => Ok(Self::canned(prompt, schema)),
            DummyReply::Text(text) => Ok(text.clone()),
            DummyReply::Fail(err) => Err(err.clone().into()),
            DummyReply::Unconfigured => Err(Error::missing("Gemini API key")),
        }
    }
}
