use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured configuration for one provider, supplied by the
/// orchestration layer when an adapter is built.
///
/// Provider-specific settings (engine names, selectors, region codes,
/// ...) live in the free-form `config` map; the typed accessors below
/// read from it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,

    #[serde(default)]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub config: HashMap<String, Value>,

    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: u32,

    /// Rate-limit window in seconds
    #[serde(default = "default_rate_limit_period")]
    pub rate_limit_period: u32,
}

fn default_rate_limit_requests() -> u32 {
    100
}

fn default_rate_limit_period() -> u32 {
    3600
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: None,
            config: HashMap::new(),
            rate_limit_requests: default_rate_limit_requests(),
            rate_limit_period: default_rate_limit_period(),
        }
    }

    /// String value from the free-form config map.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    /// Unsigned integer value from the free-form config map.
    pub fn config_u64(&self, key: &str) -> Option<u64> {
        self.config.get(key).and_then(Value::as_u64)
    }

    /// Boolean value from the free-form config map.
    pub fn config_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).and_then(Value::as_bool)
    }

    /// Object value from the free-form config map.
    pub fn config_object(&self, key: &str) -> Option<&serde_json::Map<String, Value>> {
        self.config.get(key).and_then(Value::as_object)
    }
}
