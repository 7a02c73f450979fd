//! cache_status tool implementation.
//!
//! Reports occupancy and hit counters of the search cache.

use marquee_core::{AggregationService, MovieSource};
use rmcp::{ErrorData as McpError, model::*};

/// Implementation of the cache_status tool.
pub async fn status_impl<A, B>(service: &AggregationService<A, B>) -> Result<CallToolResult, McpError>
where
    A: MovieSource,
    B: MovieSource,
{
    let status = service.cache_status();
    let json = serde_json::to_string_pretty(&status)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize cache status: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
