//! # Storefront Configuration
//!
//! Settings the client state layer needs at start-up.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     STOREFRONT_API_BASE_URL=https://api.shop.example                    │
//! │     STOREFRONT_DEFAULT_CURRENCY=EUR                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/storefront/storefront.toml (Linux)                        │
//! │     ~/Library/Application Support/com.storefront.storefront/ (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! api_base_url = "https://api.shop.example"
//! base_currency = "USD"
//! default_currency = "EUR"
//! search_debounce_ms = 1000
//! skeleton_rows = 6
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use storefront_core::{ListView, DEFAULT_CURRENCY_CODE, SKELETON_ROWS};

use crate::error::{StateError, StateResult};

const ENV_PREFIX: &str = "STOREFRONT_";
const CONFIG_FILE: &str = "storefront.toml";

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_currency_code() -> String {
    DEFAULT_CURRENCY_CODE.to_string()
}

fn default_search_debounce_ms() -> u64 {
    1000
}

fn default_skeleton_rows() -> usize {
    SKELETON_ROWS
}

/// Client state configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Base URL of the REST API, handed to the HTTP client.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Currency the API quotes prices in.
    #[serde(default = "default_currency_code")]
    pub base_currency: String,

    /// Currency selected when the currency list first arrives.
    #[serde(default = "default_currency_code")]
    pub default_currency: String,

    /// Quiet interval before a search query is emitted.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Placeholder rows drawn while a list is loading.
    #[serde(default = "default_skeleton_rows")]
    pub skeleton_rows: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            api_base_url: default_api_base_url(),
            base_currency: default_currency_code(),
            default_currency: default_currency_code(),
            search_debounce_ms: default_search_debounce_ms(),
            skeleton_rows: default_skeleton_rows(),
        }
    }
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`storefront.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StateResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> StateResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StateError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> StateResult<Self> {
        toml::from_str(contents).map_err(|e| StateError::ConfigLoadFailed(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StateResult<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            StateError::InvalidConfig(format!("api_base_url {:?}: {}", self.api_base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StateError::InvalidConfig(format!(
                "api_base_url must be http or https, got: {}",
                url.scheme()
            )));
        }

        for (field, code) in [
            ("base_currency", &self.base_currency),
            ("default_currency", &self.default_currency),
        ] {
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(StateError::InvalidConfig(format!(
                    "{} must be a 3-letter currency code, got: {:?}",
                    field, code
                )));
            }
        }

        if self.search_debounce_ms == 0 {
            return Err(StateError::InvalidConfig(
                "search_debounce_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(url) = var("API_BASE_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api_base_url = url;
        }

        if let Some(code) = var("BASE_CURRENCY") {
            self.base_currency = code.trim().to_ascii_uppercase();
        }

        if let Some(code) = var("DEFAULT_CURRENCY") {
            self.default_currency = code.trim().to_ascii_uppercase();
        }

        if let Some(ms) = var("SEARCH_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.search_debounce_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring invalid STOREFRONT_SEARCH_DEBOUNCE_MS"),
            }
        }

        if let Some(rows) = var("SKELETON_ROWS") {
            match rows.parse::<usize>() {
                Ok(rows) => self.skeleton_rows = rows,
                Err(_) => warn!(value = %rows, "Ignoring invalid STOREFRONT_SKELETON_ROWS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// A list view carrying the configured skeleton row count.
    pub fn list_view<R>(&self, renderer: R) -> ListView<R> {
        ListView::new(renderer).with_skeleton_rows(self.skeleton_rows)
    }
}
