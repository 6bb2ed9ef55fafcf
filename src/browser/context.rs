//! Per-search browsing contexts.
//!
//! Every search gets a fresh CDP browser context and a page inside it, so
//! per-session cookies and storage never survive into the next search.
//! Disposing the context closes any targets still attached to it.

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::Page;
use tracing::{debug, warn};

use crate::search::errors::SearchError;

/// Create an isolated browsing context in the shared engine.
pub async fn create_context(browser: &Browser) -> Result<BrowserContextId, SearchError> {
    let response = browser
        .execute(CreateBrowserContextParams {
            dispose_on_detach: Some(true),
            proxy_server: None,
            proxy_bypass_list: None,
            origins_with_universal_network_access: None,
        })
        .await
        .map_err(|e| SearchError::Browser(format!("failed to create browsing context: {e}")))?;

    debug!("opened browsing context");
    Ok(response.result.browser_context_id)
}

/// Open a blank page inside `context_id` with a fixed viewport and the
/// shared user-agent override applied before any navigation.
pub async fn open_page(
    browser: &Browser,
    context_id: &BrowserContextId,
    user_agent: &str,
) -> Result<Page, SearchError> {
    let params = CreateTargetParams::builder()
        .url("about:blank")
        .browser_context_id(context_id.clone())
        .build()
        .map_err(SearchError::Browser)?;

    let page = browser
        .new_page(params)
        .await
        .map_err(|e| SearchError::Browser(format!("failed to open page: {e}")))?;

    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(1920)
            .height(1080)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(SearchError::Browser)?,
    )
    .await
    .map_err(|e| SearchError::Browser(format!("failed to set viewport: {e}")))?;

    page.execute(SetUserAgentOverrideParams {
        user_agent: user_agent.to_string(),
        accept_language: Some("en-US,en;q=0.9".to_string()),
        platform: Some("Win32".to_string()),
        user_agent_metadata: None,
    })
    .await
    .map_err(|e| SearchError::Browser(format!("failed to set user agent: {e}")))?;

    Ok(page)
}

/// Dispose a browsing context and everything attached to it.
///
/// Best-effort: runs on every search exit path, so failures are logged
/// rather than propagated over an outcome that is already decided.
pub async fn dispose_context(browser: &Browser, context_id: BrowserContextId) {
    if let Err(e) = browser
        .execute(DisposeBrowserContextParams {
            browser_context_id: context_id,
        })
        .await
    {
        warn!("failed to dispose browsing context: {e}");
    } else {
        debug!("disposed browsing context");
    }
}
