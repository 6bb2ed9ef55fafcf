//! MCP tool surface: one `search` tool served over stdio.

pub mod format;
mod server;

pub use server::{WolSearchServer, serve_stdio};
