//! movie_get tool implementation.
//!
//! Fetches a single title from the primary catalog by its identifier.

use marquee_core::{AggregationService, MovieSource};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the movie_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MovieGetParams {
    /// IMDb id such as "tt0468569". TMDB-only ids (`tmdb:movie:N`) are not resolvable.
    pub id: String,
}

/// Implementation of the movie_get tool.
pub async fn get_impl<A, B>(service: &AggregationService<A, B>, params: MovieGetParams) -> Result<CallToolResult, McpError>
where
    A: MovieSource,
    B: MovieSource,
{
    tracing::info!(id = %params.id, "movie_get");
    let movie = service.get_by_id(&params.id).await?;
    let json = serde_json::to_string_pretty(&movie)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize movie: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
