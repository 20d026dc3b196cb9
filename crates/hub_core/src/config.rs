use std::fmt;

use crate::{Error, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_NEWSDATA_BASE_URL: &str = "https://newsdata.io/api/1";
pub const DEFAULT_STORE_PROJECT: &str = "hub";

pub const GEMINI_API_KEY_VAR: &str = "HUB_GEMINI_API_KEY";
pub const NEWSDATA_API_KEY_VAR: &str = "HUB_NEWSDATA_API_KEY";

/// Process-wide settings. Credentials stay optional so a missing key only
/// disables the features that need it.
#[derive(Clone)]
pub struct HubConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub newsdata_api_key: Option<String>,
    pub newsdata_base_url: String,
    pub store_project: String,
    pub store_url: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            newsdata_api_key: None,
            newsdata_base_url: DEFAULT_NEWSDATA_BASE_URL.to_string(),
            store_project: DEFAULT_STORE_PROJECT.to_string(),
            store_url: None,
        }
    }
}

impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_deref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("newsdata_api_key", &self.newsdata_api_key.as_deref().map(|_| "<redacted>"))
            .field("newsdata_base_url", &self.newsdata_base_url)
            .field("store_project", &self.store_project)
            .field("store_url", &self.store_url)
            .finish()
    }
}

impl HubConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            gemini_api_key: get(GEMINI_API_KEY_VAR),
            gemini_model: get("HUB_GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: get("HUB_GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            newsdata_api_key: get(NEWSDATA_API_KEY_VAR),
            newsdata_base_url: get("HUB_NEWSDATA_BASE_URL").unwrap_or(defaults.newsdata_base_url),
            store_project: get("HUB_STORE_PROJECT_ID").unwrap_or(defaults.store_project),
            store_url: get("HUB_STORE_URL"),
        }
    }

    pub fn with_gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn with_newsdata_api_key(mut self, key: impl Into<String>) -> Self {
        self.newsdata_api_key = Some(key.into());
        self
    }

    pub fn require_gemini_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| Error::missing(&format!("Gemini API key ({})", GEMINI_API_KEY_VAR)))
    }

    pub fn require_newsdata_key(&self) -> Result<&str> {
        self.newsdata_api_key
            .as_deref()
            .ok_or_else(|| Error::missing(&format!("NewsData.io API key ({})", NEWSDATA_API_KEY_VAR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = HubConfig::from_lookup(lookup(&[]));
        assert!(config.gemini_api_key.is_none());
        assert!(config.newsdata_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.store_project, DEFAULT_STORE_PROJECT);
        assert!(config.require_gemini_key().is_err());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let config = HubConfig::from_lookup(lookup(&[(GEMINI_API_KEY_VAR, "   ")]));
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_reads_credentials() {
        let config = HubConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_VAR, "g-key"),
            (NEWSDATA_API_KEY_VAR, " n-key "),
            ("HUB_GEMINI_MODEL", "gemini-pro"),
        ]));
        assert_eq!(config.require_gemini_key().unwrap(), "g-key");
        assert_eq!(config.require_newsdata_key().unwrap(), "n-key");
        assert_eq!(config.gemini_model, "gemini-pro");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = HubConfig::default().with_gemini_api_key("secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
