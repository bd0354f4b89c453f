//! MCP tool modules.

mod search;
