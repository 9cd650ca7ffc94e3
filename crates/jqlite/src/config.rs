//! Session Configuration

use serde::{Deserialize, Serialize};

/// Session configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document URL
    pub url: String,

    /// Selector naming the element used as context when a query passes
    /// none. Resolved once when the session is built.
    pub default_context_selector: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            default_context_selector: None,
        }
    }
}

impl Config {
    /// Read a configuration from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_default_context(mut self, selector: impl Into<String>) -> Self {
        self.default_context_selector = Some(selector.into());
        self
    }
}
