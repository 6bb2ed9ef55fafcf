//! Search orchestration: engine lifecycle, navigation, and response
//! assembly.

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::page::Page;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::browser::{self, BrowserHandle};
use crate::config::SearchConfig;

use super::errors::SearchError;
use super::extractor;
use super::types::{RESULTS_CONTAINER_SELECTOR, SearchRequest, SearchResponse, SearchResult};

/// How long to wait for the browser process to exit during shutdown.
const SHUTDOWN_WAIT: Duration = Duration::from_secs(5);

/// Interval for polling the results container after navigation.
const RESULTS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the shared browser engine and runs searches against the site.
///
/// The engine handle is injected state of this orchestrator, not a process
/// global: created once by [`initialize`](Self::initialize), reused by
/// every search, released once by [`shutdown`](Self::shutdown).
pub struct SearchOrchestrator {
    config: SearchConfig,
    engine: Arc<Mutex<Option<BrowserHandle>>>,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            engine: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Launch the shared browser engine.
    ///
    /// Fatal on failure; callers are expected to abort startup rather than
    /// retry. Idempotent once it has succeeded.
    pub async fn initialize(&self) -> Result<(), SearchError> {
        let mut guard = self.engine.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let handle = browser::launch(&self.config)
            .await
            .map_err(|e| SearchError::EngineInit(e.to_string()))?;
        *guard = Some(handle);

        info!("browser engine initialized");
        Ok(())
    }

    /// Run one search and assemble a response.
    ///
    /// Internal failures (timeout, missing results, browser faults) come
    /// back as a `success = false` response carrying the failure text.
    /// Only calling before [`initialize`](Self::initialize) is an `Err`.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let url = self.build_search_url(request);

        // Rejected before the engine is touched: no navigation for an
        // empty query, initialized or not.
        if request.query().is_empty() {
            return Ok(SearchResponse::failed(
                request.query(),
                &url,
                "search query is empty",
            ));
        }

        let guard = self.engine.lock().await;
        let handle = guard.as_ref().ok_or(SearchError::NotInitialized)?;

        info!(query = %request.query(), url = %url, "starting library search");

        match Self::run_search(handle.browser(), &self.config, &url, request).await {
            Ok((results, total_results)) => {
                info!(
                    query = %request.query(),
                    count = results.len(),
                    total_results,
                    "search completed"
                );
                Ok(SearchResponse::ok(
                    request.query(),
                    total_results,
                    results,
                    &url,
                ))
            }
            Err(e) => {
                warn!(query = %request.query(), error = %e, "search failed");
                Ok(SearchResponse::failed(request.query(), &url, e.to_string()))
            }
        }
    }

    /// Deterministic search URL: percent-encoded query, fixed parameter
    /// order.
    #[must_use]
    pub fn build_search_url(&self, request: &SearchRequest) -> String {
        format!(
            "{}{}?q={}&p={}&r={}&st=a",
            self.config.base_url(),
            self.config.search_path(),
            urlencoding::encode(request.query()),
            request.search_type(),
            request.sort_by(),
        )
    }

    /// Close the browser engine and release its resources.
    ///
    /// Runs once at process teardown; failures are logged, never escalated.
    pub async fn shutdown(&self) {
        let mut guard = self.engine.lock().await;
        let Some(mut handle) = guard.take() else {
            return;
        };

        info!("shutting down browser engine");
        if let Err(e) = handle.browser_mut().close().await {
            warn!("failed to close browser cleanly: {e}");
        }
        match tokio::time::timeout(SHUTDOWN_WAIT, handle.browser_mut().wait()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("failed to wait for browser exit: {e}"),
            Err(_) => warn!("browser did not exit within {SHUTDOWN_WAIT:?}"),
        }
        handle.cleanup_profile_dir();
    }

    /// One search inside a fresh browsing context; the context is disposed
    /// on every exit path.
    async fn run_search(
        engine: &Browser,
        config: &SearchConfig,
        url: &str,
        request: &SearchRequest,
    ) -> Result<(Vec<SearchResult>, u32), SearchError> {
        let context_id = browser::create_context(engine).await?;
        let outcome = Self::run_in_context(engine, &context_id, config, url, request).await;
        browser::dispose_context(engine, context_id).await;
        outcome
    }

    async fn run_in_context(
        engine: &Browser,
        context_id: &BrowserContextId,
        config: &SearchConfig,
        url: &str,
        request: &SearchRequest,
    ) -> Result<(Vec<SearchResult>, u32), SearchError> {
        let page = browser::open_page(engine, context_id, browser::USER_AGENT).await?;

        let outcome = Self::load_results_page(&page, config, url).await;

        // The page belongs to a context that is about to be disposed, but
        // closing it promptly keeps renderer memory in check.
        if let Err(e) = page.close().await {
            debug!("failed to close search page: {e}");
        }

        let html = outcome?;
        let results = extractor::extract(&html, request.query(), config.base_url(), request.limit());
        let total_results = extractor::total_results(&html);
        Ok((results, total_results))
    }

    /// Navigate to the search URL and return the page HTML once the
    /// results container has rendered.
    ///
    /// Navigation and rendering share one timeout budget; the container is
    /// polled because the site builds the result list client-side after
    /// the load event.
    async fn load_results_page(
        page: &Page,
        config: &SearchConfig,
        url: &str,
    ) -> Result<String, SearchError> {
        let budget = Duration::from_millis(config.timeout_ms());
        let started = Instant::now();

        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(budget, navigation).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(SearchError::Browser(e.to_string())),
            Err(_) => {
                return Err(SearchError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_ms: config.timeout_ms(),
                });
            }
        }

        loop {
            if page.find_element(RESULTS_CONTAINER_SELECTOR).await.is_ok() {
                debug!(elapsed = ?started.elapsed(), "results container rendered");
                break;
            }
            if started.elapsed() >= budget {
                let current = page
                    .url()
                    .await
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "about:blank".to_string());
                return Err(SearchError::ResultsNotFound(format!(
                    "selector '{RESULTS_CONTAINER_SELECTOR}' never appeared (page: {current})"
                )));
            }
            tokio::time::sleep(RESULTS_POLL_INTERVAL).await;
        }

        Ok(page.content().await?)
    }
}
