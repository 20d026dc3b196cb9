use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;

use crate::Result;

/// Shape the completion endpoint is asked to constrain its output to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSchema {
    StringArray,
}

impl ResponseSchema {
    pub fn mime_type(&self) -> &'static str {
        "application/json"
    }

    pub fn to_json(&self) -> Value {
        match self {
            ResponseSchema::StringArray => json!({
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }),
        }
    }
}

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send one prompt and return the generated text. A single attempt, no retry.
    async fn complete(&self, prompt: &str, schema: Option<ResponseSchema>) -> Result<String>;
}
