use std::sync::Arc;

use hub_core::{CompletionModel, Error, HubConfig, Result};

pub mod dummy;
pub mod gemini;

pub use dummy::{DummyModel, DummyReply};
pub use gemini::GeminiModel;

pub const AVAILABLE_MODELS: &[&str] = &["gemini", "dummy"];

/// Build the completion model named on the command line.
pub fn create_model(name: &str, config: &HubConfig) -> Result<Arc<dyn CompletionModel>> {
    match name.to_lowercase().as_str() {
        "gemini" => Ok(Arc::new(GeminiModel::from_config(config))),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::InvalidInput(format!(
            "Unknown model '{}'. Available models: {}",
            other,
            AVAILABLE_MODELS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_by_name() {
        let config = HubConfig::default();
        assert_eq!(create_model("gemini", &config).unwrap().name(), "Gemini");
        assert_eq!(create_model("Dummy", &config).unwrap().name(), "Dummy");

        let err = create_model("gpt", &config).unwrap_err();
        assert!(err.to_string().contains("Available models: gemini, dummy"));
    }
}
