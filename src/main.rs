// MCP stdio server for Watchtower Online Library search.
//
// Launches a shared headless Chromium instance at startup and serves a
// single `search` tool over stdio until the client disconnects.

use anyhow::{Context, Result};
use std::sync::Arc;

use wol_search_mcp::config::SearchConfig;
use wol_search_mcp::search::SearchOrchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the MCP transport.
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
                .add_directive("chromiumoxide::handler=off".parse()?)
                .add_directive("chromiumoxide::conn=off".parse()?),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = SearchConfig::from_env();
    let orchestrator = Arc::new(SearchOrchestrator::new(config));

    // Engine startup failure is fatal; there is nothing to serve without it.
    orchestrator
        .initialize()
        .await
        .context("browser engine failed to start")?;

    let served = wol_search_mcp::mcp::serve_stdio(orchestrator.clone()).await;

    orchestrator.shutdown().await;

    served.map_err(|e| anyhow::anyhow!("stdio server error: {e}"))
}
