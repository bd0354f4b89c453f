//! MCP server implementation for realtor-mcp.
//!
//! This crate wires the property search client into an rmcp tool handler and
//! exposes the stdio and streamable HTTP runners.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use realtor_core::PropertySearchClient;
use rmcp::{ServerHandler, handler::server::tool::ToolRouter, tool_handler};
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};

const SERVER_NAME: &str = "realtor-mcp";

const SERVER_INSTRUCTIONS: &str = r"realtor-mcp searches real estate listings through a remote property API.

Use `property_search` with:
- `query` (required): amenities and intangibles the user wants. Leave out bedroom/bath/size
  constraints (they have their own fields) and anything the user wants to avoid.
- `limit`, `max_price`, `min_baths`, `min_beds`, `min_sqft` to narrow results.
- `search_center_latitude` and `search_center_longitude` together, with `search_radius` in miles,
  for a spatial search. Setting only one of the two coordinates is rejected.

The tool returns the API response as indented JSON text.";

/// MCP server wrapper around the property search client.
#[derive(Clone)]
pub struct RealtorMcp {
    tool_router: ToolRouter<Self>,
    client: Arc<PropertySearchClient>,
}

impl RealtorMcp {
    /// Creates a new server owning the given client.
    #[must_use]
    pub fn new(client: PropertySearchClient) -> Self {
        Self::with_client(Arc::new(client))
    }

    /// Creates a new server using a shared client handle.
    #[must_use]
    pub fn with_client(client: Arc<PropertySearchClient>) -> Self {
        Self {
            tool_router: Self::tool_router_search(),
            client,
        }
    }

    pub(crate) fn client(&self) -> &PropertySearchClient {
        &self.client
    }
}

#[tool_handler]
impl ServerHandler for RealtorMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
