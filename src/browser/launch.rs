//! Launching and tearing down the shared Chromium instance.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::config::SearchConfig;

/// User agent presented to the site.
///
/// Matches the Chrome build the managed fetcher downloads; the site's bot
/// mitigation rejects mismatched or headless-flavoured agent strings.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// A launched browser, its CDP event-handler task, and its profile dir.
///
/// The handler task MUST be aborted when the browser goes away or it runs
/// forever; `Drop` takes care of that. The profile dir is removed by
/// `cleanup_profile_dir()` after the process has exited and released its
/// file handles.
pub struct BrowserHandle {
    browser: Browser,
    handler: JoinHandle<()>,
    profile_dir: Option<PathBuf>,
}

impl BrowserHandle {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, profile_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            profile_dir: Some(profile_dir),
        }
    }

    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Remove the temp profile directory.
    ///
    /// Call after `browser.wait()` completes; Windows refuses to delete
    /// files Chrome still holds open.
    pub fn cleanup_profile_dir(&mut self) {
        if let Some(path) = self.profile_dir.take() {
            debug!("removing browser profile dir: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!("failed to remove profile dir {}: {e}", path.display());
            }
        }
    }
}

impl Drop for BrowserHandle {
    fn drop(&mut self) {
        self.handler.abort();
        if self.profile_dir.is_some() {
            warn!("browser handle dropped without explicit shutdown, removing profile dir");
            self.cleanup_profile_dir();
        }
    }
}

/// Launch Chromium with the fixed flag set the target site tolerates.
///
/// Headless by default, automation-detection signatures disabled, and
/// sandboxing off so the engine starts inside containers and other
/// restricted hosts.
pub async fn launch(config: &SearchConfig) -> Result<BrowserHandle> {
    let chrome_path = resolve_executable().await?;

    let profile_dir = std::env::temp_dir().join(format!("wol_search_chrome_{}", std::process::id()));
    std::fs::create_dir_all(&profile_dir).context("failed to create browser profile dir")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_millis(config.timeout_ms()))
        .window_size(1920, 1080)
        .user_data_dir(profile_dir.clone())
        .chrome_executable(chrome_path);

    if config.headless() {
        builder = builder.headless_mode(HeadlessMode::default());
    } else {
        builder = builder.with_head();
    }

    builder = builder
        .arg(format!("--user-agent={USER_AGENT}"))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-extensions")
        .arg("--disable-popup-blocking")
        .arg("--disable-background-networking")
        .arg("--disable-breakpad")
        .arg("--disable-hang-monitor")
        .arg("--disable-prompt-on-repost")
        .arg("--password-store=basic")
        .arg("--use-mock-keychain")
        .arg("--hide-scrollbars")
        .arg("--mute-audio");

    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

    info!(headless = config.headless(), "launching browser engine");
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let msg = e.to_string();
                // Chrome emits CDP events chromiumoxide does not model;
                // those decode failures are noise, not faults.
                if !msg.contains("data did not match any variant of untagged enum Message") {
                    error!("browser event handler: {msg}");
                }
            }
        }
        debug!("browser event handler finished");
    });

    Ok(BrowserHandle::new(browser, handler_task, profile_dir))
}

/// Locate a Chrome/Chromium executable: explicit override, then PATH,
/// then the managed download.
async fn resolve_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("WOL_SEARCH_CHROME") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("using browser from WOL_SEARCH_CHROME: {}", path.display());
            return Ok(path);
        }
        warn!("WOL_SEARCH_CHROME points at {}, which does not exist", path.display());
    }

    if !cfg!(target_os = "windows") {
        for candidate in &["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(candidate).output()
                && output.status.success()
            {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    info!("found browser on PATH: {path_str}");
                    return Ok(PathBuf::from(path_str));
                }
            }
        }
    }

    let mac_chrome = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
    if mac_chrome.exists() {
        return Ok(mac_chrome);
    }

    warn!("no local Chrome/Chromium found, downloading managed browser");
    download_managed().await
}

/// Download the pinned Chromium revision.
///
/// The fetcher's default revision is a hard constraint: newer Chromium
/// builds trip the site's security layer and return an interstitial
/// instead of search results.
async fn download_managed() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("wol-search-mcp")
        .join("chromium");

    std::fs::create_dir_all(&cache_dir).context("failed to create browser cache dir")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("failed to build fetcher options")?,
    );

    let revision_info = fetcher.fetch().await.context("failed to download browser")?;
    info!("downloaded Chromium to {}", revision_info.folder_path.display());

    Ok(revision_info.executable_path)
}
