//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use storefront_cart::cart::CartStore;
use storefront_cart::gateway::HttpGateway;
use storefront_kv::FileStore;

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// API client.
    pub gateway: Arc<HttpGateway>,
    /// The persisted cart.
    pub cart: CartStore,
}

impl Context {
    /// Load config and open the persisted cart.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let mut config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };
        config.cart = config.cart.with_env_overrides();

        let storage_dir = config.storage.resolved_dir();
        let store = FileStore::open(&storage_dir)
            .with_context(|| format!("Failed to open cart storage: {}", storage_dir.display()))?;
        output.debug(&format!("Cart storage: {}", storage_dir.display()));
        output.debug(&format!("API: {}", config.cart.api_base_url));

        let gateway = Arc::new(HttpGateway::from_config(&config.cart));
        let cart = CartStore::with_config(gateway.clone(), Arc::new(store), &config.cart);
        tracing::info!(
            storage = %storage_dir.display(),
            items = cart.view().items.len(),
            "opened cart"
        );

        Ok(Self {
            config,
            output,
            gateway,
            cart,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["cart.toml", ".cart.toml", "cart.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory holding the persisted cart.
    pub fn storage_dir(&self) -> PathBuf {
        self.config.storage.resolved_dir()
    }
}
