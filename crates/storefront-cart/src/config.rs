//! Cart configuration.

use crate::error::CartError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "STOREFRONT_API_URL";
/// Overrides `destination_country`.
pub const ENV_COUNTRY: &str = "STOREFRONT_COUNTRY";

/// Cart configuration.
///
/// ```toml
/// api_base_url = "https://shop.example.com/api"
/// destination_country = "EG"
/// storage_namespace = "storefront"
/// request_timeout_secs = 15
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CartConfig {
    /// Base URL of the storefront REST API.
    pub api_base_url: String,
    /// Country used for cart-level shipping quotes.
    pub destination_country: String,
    /// Prefix of the persisted cart keys.
    pub storage_namespace: String,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            destination_country: "EG".to_string(),
            storage_namespace: "storefront".to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl CartConfig {
    /// Parse TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, CartError> {
        toml::from_str(content).map_err(|e| CartError::Config(e.to_string()))
    }

    /// Load from a file: JSON when the extension is `.json`, TOML otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CartError::Config(format!("{}: {}", path.display(), e)))?;

        if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content)
                .map_err(|e| CartError::Config(format!("{}: {}", path.display(), e)))
        } else {
            Self::from_toml_str(&content)
                .map_err(|e| CartError::Config(format!("{}: {}", path.display(), e)))
        }
    }

    /// Apply `STOREFRONT_API_URL` and `STOREFRONT_COUNTRY` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(country) = lookup(ENV_COUNTRY).filter(|v| !v.trim().is_empty()) {
            self.destination_country = country.trim().to_uppercase();
        }
        self
    }
}
