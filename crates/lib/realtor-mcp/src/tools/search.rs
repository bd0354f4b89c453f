use realtor_core::SearchArgs;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool,
    tool_router,
};
use tracing::debug;

use crate::{RealtorMcp, helpers};

#[tool_router(router = tool_router_search, vis = "pub")]
impl RealtorMcp {
    #[tool(
        description = "Search for a real estate property via spatial, semantic, or hybrid search",
        annotations(
            title = "Property Search",
            read_only_hint = true,
            open_world_hint = true
        )
    )]
    async fn property_search(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(query = %args.query, "property_search called");
        let body = self
            .client()
            .search_args(args)
            .await
            .map_err(helpers::map_search_err)?;
        Ok(CallToolResult::success(vec![Content::text(body)]))
    }
}
