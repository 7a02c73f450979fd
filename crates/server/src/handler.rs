//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    MovieGetParams, MovieSearchParams,
    cache::{clear_impl, status_impl},
    movie_get::get_impl,
    movie_search::search_impl,
};

use marquee_client::{OmdbClient, TmdbClient};
use marquee_core::AggregationService;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The production pipeline: OMDb primary, TMDB secondary.
pub type MovieService = AggregationService<OmdbClient, TmdbClient>;

/// The main MCP server handler for marquee.
#[derive(Clone)]
pub struct MovieServer {
    tool_router: ToolRouter<Self>,
    service: Arc<MovieService>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl MovieServer {
    /// Create a new server handler.
    pub fn new(service: Arc<MovieService>) -> Self {
        Self { tool_router: Self::tool_router(), service }
    }

    /// Search movies and series across both catalogs.
    #[tool(
        description = "Search movies and TV series by title, actors, genre, type (movie|series|episode) and year. \
                       At least one filter is required. Returns one page of merged results sorted by rating."
    )]
    async fn movie_search(&self, params: Parameters<MovieSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.service, params.0).await
    }

    /// Get one title by its identifier.
    #[tool(
        description = "Get full details for a movie or series by IMDb id (e.g. tt0468569). \
                       Lookups go to OMDb only: `tmdb:movie:N` and `tmdb:tv:N` ids carried by \
                       TMDB-only search results cannot be resolved here."
    )]
    async fn movie_get(&self, params: Parameters<MovieGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.service, params.0).await
    }

    #[tool(description = "Report search cache size, capacity, TTL and hit/miss counters.")]
    async fn cache_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.service).await
    }

    #[tool(description = "Clear all cached search results and movie details.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_impl(&self.service).await
    }
}

impl ServerHandler for MovieServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "marquee".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Movie and TV metadata aggregated from OMDb and TMDB. Use movie_search to find titles \
                 and movie_get for full details."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
