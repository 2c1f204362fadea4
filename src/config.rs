//! Configuration for the UI thread dispatcher.

use serde::Deserialize;

/// Default name given to the spawned UI thread
pub const DEFAULT_UI_THREAD_NAME: &str = "ui-thread";

/// Settings for [`UiThread`](crate::core::UiThread).
///
/// Every field has a default, so a partial document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiThreadConfig {
    /// OS-level name of the UI thread
    pub thread_name: String,
}

impl Default for UiThreadConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_UI_THREAD_NAME.to_string(),
        }
    }
}

impl UiThreadConfig {
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Parse a JSON document, keeping defaults for missing fields.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UiThreadConfig::default();
        assert_eq!(config.thread_name, "ui-thread");
    }

    #[test]
    fn test_builder_overrides() {
        let config = UiThreadConfig::default().with_thread_name("fx-app");
        assert_eq!(config.thread_name, "fx-app");
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config = UiThreadConfig::from_json(r#"{"thread_name": "render"}"#).unwrap();
        assert_eq!(config.thread_name, "render");

        let config = UiThreadConfig::from_json("{}").unwrap();
        assert_eq!(config, UiThreadConfig::default());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(UiThreadConfig::from_json(r#"{"thread_name": 42}"#).is_err());
        assert!(UiThreadConfig::from_json("not json").is_err());
    }
}
