//! movie_search tool implementation.
//!
//! Runs a filtered search across both catalogs and returns one page of the
//! merged, deduplicated result set.

use marquee_core::{AggregationService, Error, MediaType, MovieSource, SearchRequest};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for movie_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MovieSearchParams {
    /// Title keywords, sent to both upstream searches.
    #[serde(default)]
    pub title: Option<String>,

    /// Actor name; matches any single credited actor, e.g. "Bale".
    #[serde(default)]
    pub actors: Option<String>,

    /// Genre label, e.g. "crime".
    #[serde(default)]
    pub genre: Option<String>,

    /// movie, series or episode.
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,

    /// Four-digit release year.
    #[serde(default)]
    pub year: Option<String>,

    /// Page number, starting at 1 (default 1).
    #[serde(default = "default_page")]
    pub page: u32,

    /// Results per page, 1-100 (default 10).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    marquee_core::movie::DEFAULT_LIMIT
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl MovieSearchParams {
    /// Convert tool input into a search request. Blank strings count as absent.
    pub fn into_request(self) -> Result<SearchRequest, Error> {
        let media_type = present(self.media_type)
            .map(|t| t.parse::<MediaType>())
            .transpose()?;

        Ok(SearchRequest {
            title: present(self.title),
            actors: present(self.actors),
            genre: present(self.genre),
            media_type,
            year: present(self.year),
            page: self.page,
            limit: self.limit,
        })
    }
}

/// Implementation of the movie_search tool.
pub async fn search_impl<A, B>(
    service: &AggregationService<A, B>, params: MovieSearchParams,
) -> Result<CallToolResult, McpError>
where
    A: MovieSource,
    B: MovieSource,
{
    let request = params.into_request()?;
    tracing::info!(
        title = request.title.as_deref(),
        actors = request.actors.as_deref(),
        genre = request.genre.as_deref(),
        page = request.page,
        limit = request.limit,
        "movie_search"
    );

    let result = service.search(&request).await?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize results: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{dark_knight, output, service};
    use marquee_core::PagedResult;

    #[test]
    fn test_params_defaults() {
        let params: MovieSearchParams = serde_json::from_str(r#"{"title": "batman"}"#).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
    }

    #[test]
    fn test_into_request() {
        let params: MovieSearchParams =
            serde_json::from_str(r#"{"title": " batman ", "actors": "", "type": "Series", "page": 2}"#).unwrap();
        let req = params.into_request().unwrap();
        assert_eq!(req.title.as_deref(), Some("batman"));
        assert!(req.actors.is_none());
        assert_eq!(req.media_type, Some(MediaType::Series));
        assert_eq!(req.page, 2);
    }

    #[test]
    fn test_unknown_type_is_invalid() {
        let params = MovieSearchParams { media_type: Some("documentary".into()), ..Default::default() };
        assert!(matches!(params.into_request(), Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_impl_returns_page() {
        let svc = service(vec![dark_knight()], vec![]);
        let params = MovieSearchParams { title: Some("batman".into()), actors: Some("Bale".into()), ..Default::default() };

        let result = search_impl(&svc, params).await.unwrap();
        let page: PagedResult = output(&result);
        assert_eq!(page.total_results, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.movies[0].title, "The Dark Knight");
    }

    #[tokio::test]
    async fn test_search_impl_requires_a_filter() {
        let svc = service(vec![dark_knight()], vec![]);
        let params = MovieSearchParams { title: Some("   ".into()), ..Default::default() };

        let err = search_impl(&svc, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
