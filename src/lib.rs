pub mod browser;
pub mod config;
pub mod mcp;
pub mod search;

pub use browser::BrowserHandle;
pub use config::SearchConfig;
pub use mcp::WolSearchServer;
pub use search::{SearchError, SearchOrchestrator, SearchRequest, SearchResponse, SearchResult};
