//! CLI configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_cart::CartConfig;

/// CLI configuration file.
///
/// ```toml
/// [cart]
/// api_base_url = "https://shop.example.com/api"
/// destination_country = "EG"
///
/// [storage]
/// dir = "/var/lib/storefront-cart"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart configuration.
    #[serde(default)]
    pub cart: CartConfig,

    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the file-backed store.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured directory, or `~/.local/share/storefront-cart`.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| data_dir().join("storefront-cart"))
    }
}

/// Get the platform-specific data directory.
fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(
            &path,
            r#"
[cart]
api_base_url = "https://shop.example.com/api"

[storage]
dir = "/tmp/cart-test"
"#,
        )
        .unwrap();

        let config = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.cart.api_base_url, "https://shop.example.com/api");
        assert_eq!(config.cart.destination_country, "EG");
        assert_eq!(
            config.storage.resolved_dir(),
            PathBuf::from("/tmp/cart-test")
        );
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, r#"{"cart": {"destination_country": "SA"}}"#).unwrap();

        let config = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.cart.destination_country, "SA");
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn test_bad_config_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[cart\n").unwrap();

        let err = CliConfig::load(path.to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_default_storage_dir() {
        let dir = StorageConfig::default().resolved_dir();
        assert!(dir.ends_with("storefront-cart"));
    }
}
