//! cache_clear tool implementation.
//!
//! Drops every cached search and detail entry.

use marquee_core::{AggregationService, MovieSource};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    pub cleared: bool,
    /// Search cache entries remaining afterwards.
    pub size: usize,
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl<A, B>(service: &AggregationService<A, B>) -> Result<CallToolResult, McpError>
where
    A: MovieSource,
    B: MovieSource,
{
    service.clear_cache();
    let output = CacheClearOutput { cleared: true, size: service.cache_status().size };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{dark_knight, output, service};
    use marquee_core::SearchRequest;

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let svc = service(vec![dark_knight()], vec![]);
        svc.search(&SearchRequest { title: Some("batman".into()), ..Default::default() }).await.unwrap();
        assert_eq!(svc.cache_status().size, 1);

        let cleared: CacheClearOutput = output(&clear_impl(&svc).await.unwrap());
        assert!(cleared.cleared);
        assert_eq!(cleared.size, 0);
        assert_eq!(svc.cache_status().size, 0);
    }
}
