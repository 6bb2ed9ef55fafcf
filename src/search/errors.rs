//! Error types for search operations.

use thiserror::Error;

/// Failures a search can run into.
///
/// Only `EngineInit` is fatal to the process. `NotInitialized` is caller
/// misuse and is returned as-is; everything else is caught at the
/// orchestration boundary and folded into a `success = false` response.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The browser engine could not be started.
    #[error("failed to start browser engine: {0}")]
    EngineInit(String),

    /// `search()` was called before `initialize()` succeeded.
    #[error("search engine not initialized; call initialize() first")]
    NotInitialized,

    /// Navigation did not complete within the configured budget.
    #[error("navigation to {url} timed out after {timeout_ms} ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    /// The results container never appeared: zero matches rendered, or the
    /// site layout changed underneath the fixed selectors.
    #[error("search results never appeared: {0}")]
    ResultsNotFound(String),

    /// The browser transport failed mid-operation.
    #[error("browser error: {0}")]
    Browser(String),
}

impl SearchError {
    /// Whether this failure should abort the whole process.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, SearchError::EngineInit(_))
    }
}

impl From<chromiumoxide::error::CdpError> for SearchError {
    fn from(error: chromiumoxide::error::CdpError) -> Self {
        SearchError::Browser(error.to_string())
    }
}
