//! Runtime configuration for the search service.
//!
//! All settings are read once at startup, either from environment variables
//! (`from_env`) or programmatically through the builder. Nothing here is
//! reloaded at runtime.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// Site root the search URL is built against.
pub const DEFAULT_BASE_URL: &str = "https://wol.jw.org";

/// Search endpoint path below the base URL (English research edition).
pub const DEFAULT_SEARCH_PATH: &str = "/en/wol/s/r1/lp-e";

/// Budget for navigation plus results rendering, per search.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for the search orchestrator.
///
/// Base URL and search path are substitutable so a site-layout or endpoint
/// change does not require a code edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub(crate) headless: bool,
    pub(crate) timeout_ms: u64,
    pub(crate) base_url: String,
    pub(crate) search_path: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Read configuration from `WOL_SEARCH_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("WOL_SEARCH_HEADLESS") {
            config.headless = !matches!(value.trim(), "0" | "false" | "no");
        }

        if let Ok(value) = std::env::var("WOL_SEARCH_TIMEOUT_MS") {
            match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout_ms = ms,
                _ => warn!(
                    "ignoring invalid WOL_SEARCH_TIMEOUT_MS value '{value}', keeping {} ms",
                    config.timeout_ms
                ),
            }
        }

        if let Ok(value) = std::env::var("WOL_SEARCH_BASE_URL") {
            match Url::parse(value.trim()) {
                Ok(_) => config.base_url = value.trim().trim_end_matches('/').to_string(),
                Err(e) => warn!("ignoring invalid WOL_SEARCH_BASE_URL '{value}': {e}"),
            }
        }

        if let Ok(value) = std::env::var("WOL_SEARCH_PATH") {
            config.search_path = value.trim().to_string();
        }

        config
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn search_path(&self) -> &str {
        &self.search_path
    }
}

/// Builder for [`SearchConfig`] with validation at `build()`.
#[derive(Debug, Clone)]
pub struct SearchConfigBuilder {
    headless: bool,
    timeout_ms: u64,
    base_url: String,
    search_path: String,
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            headless: defaults.headless,
            timeout_ms: defaults.timeout_ms,
            base_url: defaults.base_url,
            search_path: defaults.search_path,
        }
    }
}

impl SearchConfigBuilder {
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn search_path(mut self, search_path: impl Into<String>) -> Self {
        self.search_path = search_path.into();
        self
    }

    pub fn build(self) -> Result<SearchConfig> {
        Url::parse(&self.base_url).with_context(|| format!("invalid base URL '{}'", self.base_url))?;
        anyhow::ensure!(self.timeout_ms > 0, "timeout must be non-zero");

        Ok(SearchConfig {
            headless: self.headless,
            timeout_ms: self.timeout_ms,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            search_path: self.search_path,
        })
    }
}
