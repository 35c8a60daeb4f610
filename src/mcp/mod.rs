//! MCP server for the question/answer corpus
//!
//! Exposes the answer lookup to MCP clients over stdio.

mod server;

pub use server::run_mcp_server;
