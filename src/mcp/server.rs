//! rmcp stdio server exposing the `search` tool.

use rmcp::{
    ErrorData as McpError, ServiceExt,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use crate::search::{DEFAULT_RESULT_LIMIT, SearchOrchestrator, SearchRequest};

use super::format;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Search text to run against the Watchtower Online Library.
    pub message: String,

    /// Maximum number of results to return (1-10, default 5).
    pub limit: Option<u32>,
}

#[derive(Clone)]
pub struct WolSearchServer {
    tool_router: ToolRouter<Self>,
    orchestrator: Arc<SearchOrchestrator>,
}

#[tool_router]
impl WolSearchServer {
    #[must_use]
    pub fn new(orchestrator: Arc<SearchOrchestrator>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            orchestrator,
        }
    }

    #[tool(
        description = "Search the Watchtower Online Library (wol.jw.org) and return up to 10 \
                       ranked results with title, publication, year, occurrence count, link, \
                       and snippet. Results link directly to the matching paragraph."
    )]
    async fn search(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        if args.message.trim().is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                format::REJECTION_MESSAGE,
            )]));
        }

        let limit = args
            .limit
            .map_or(DEFAULT_RESULT_LIMIT, |requested| requested as usize);
        let request = SearchRequest::new(args.message, limit);

        let response = self
            .orchestrator
            .search(&request)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(
            format::render_response(&response),
        )]))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for WolSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Searches the Watchtower Online Library through a headless browser. \
                 One tool: search(message, limit). Output is presentation text."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve the search tool over stdio until the client disconnects.
pub async fn serve_stdio(orchestrator: Arc<SearchOrchestrator>) -> Result<(), McpError> {
    let service = WolSearchServer::new(orchestrator);
    let running = service
        .serve(stdio())
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    running
        .waiting()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(())
}
