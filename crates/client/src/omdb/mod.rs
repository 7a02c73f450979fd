//! OMDb API client, the primary catalog source.
//!
//! ### Endpoints
//!
//! - **Search**: `GET {base}?apikey=…&s={title}&type=…&y=…&page=1`
//! - **Detail**: `GET {base}?apikey=…&i={imdb id}&plot=full`
//!
//! OMDb always answers 200 and reports failures in the body
//! (`"Response": "False"` plus an `Error` message), so errors are classified
//! from that message as well as from the HTTP status.
//!
//! List results carry no cast or genres. When a search filters on either,
//! every hit is re-fetched through the detail endpoint with bounded
//! concurrency; a failed enrichment keeps the summary record.

pub mod request;
pub mod response;

pub use request::OmdbParams;
pub use response::{OmdbDetailResponse, OmdbRecord, OmdbSearchResponse};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use marquee_core::{AppConfig, DropReason, Movie, MovieSource, NativeQuery, SourceError, SourceTag};
use serde::de::DeserializeOwned;

use crate::http;
use crate::retry::RetryPolicy;

/// Default OMDb endpoint.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "marquee/0.1";

/// Detail lookups in flight at once during enrichment.
const DETAIL_CONCURRENCY: usize = 4;

/// OMDb client configuration.
#[derive(Debug, Clone)]
pub struct OmdbConfig {
    /// API key; calls fail with `MissingApiKey` while unset.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&AppConfig> for OmdbConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.omdb_api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.omdb_base_url.clone(),
            timeout: config.source_timeout(),
            user_agent: config.user_agent.clone(),
            retry: RetryPolicy::from(config),
        }
    }
}

/// OMDb API client.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: reqwest::Client,
    config: OmdbConfig,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Result<Self, SourceError> {
        let http = http::build_client(config.timeout, &config.user_agent)?;
        Ok(Self { http, config })
    }

    fn api_key(&self) -> Result<&str, SourceError> {
        self.config.api_key.as_deref().ok_or(SourceError::MissingApiKey)
    }

    async fn call<T: DeserializeOwned>(&self, params: &OmdbParams, what: &str) -> Result<T, SourceError> {
        let key = self.api_key()?;
        let url = http::endpoint(&self.config.base_url, "")?;
        self.config
            .retry
            .run(what, || {
                let request = self
                    .http
                    .get(url.clone())
                    .query(&[("apikey", key)])
                    .query(params);
                http::get_json(request, what)
            })
            .await
    }

    /// Run a list search, enriching hits when cast or genres are needed.
    pub async fn search_records(&self, query: &NativeQuery) -> Result<Vec<OmdbRecord>, SourceError> {
        self.api_key()?;
        let Some(params) = OmdbParams::search(query) else {
            tracing::debug!("omdb search skipped: no title to search for");
            return Ok(Vec::new());
        };

        let start = Instant::now();
        let response: OmdbSearchResponse = self.call(&params, "omdb search").await?;
        let records = response.into_records()?;
        tracing::debug!("omdb search returned {} records in {:?}", records.len(), start.elapsed());

        if query.needs_details && !records.is_empty() {
            return Ok(self.enrich(records).await);
        }
        Ok(records)
    }

    /// Fetch the full record for an IMDb id.
    pub async fn detail_record(&self, id: &str) -> Result<OmdbRecord, SourceError> {
        let response: OmdbDetailResponse = self.call(&OmdbParams::detail(id), "omdb detail").await?;
        response.into_record(id)
    }

    async fn enrich(&self, records: Vec<OmdbRecord>) -> Vec<OmdbRecord> {
        stream::iter(records)
            .map(|summary| async move {
                let Some(id) = summary.imdb_id.clone().filter(|id| !id.trim().is_empty()) else {
                    return summary;
                };
                match self.detail_record(&id).await {
                    Ok(full) => full,
                    Err(e) => {
                        tracing::warn!(id = %id, error = %e, "omdb enrichment failed, keeping summary");
                        summary
                    }
                }
            })
            .buffered(DETAIL_CONCURRENCY)
            .collect()
            .await
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    type Raw = OmdbRecord;

    fn tag(&self) -> SourceTag {
        SourceTag::Omdb
    }

    async fn search(&self, query: &NativeQuery) -> Result<Vec<OmdbRecord>, SourceError> {
        self.search_records(query).await
    }

    async fn get_detail(&self, id: &str) -> Result<OmdbRecord, SourceError> {
        self.detail_record(id).await
    }

    fn normalize(&self, raw: OmdbRecord) -> Result<Movie, DropReason> {
        response::normalize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Points at a closed local port so a stray request fails fast.
    fn offline(api_key: Option<&str>) -> OmdbClient {
        OmdbClient::new(OmdbConfig {
            api_key: api_key.map(str::to_string),
            base_url: "http://127.0.0.1:9/".into(),
            timeout: Duration::from_millis(200),
            retry: RetryPolicy::none(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { omdb_api_key: Some("  ".into()), retry_count: 4, ..Default::default() };
        let config = OmdbConfig::from(&app);
        assert!(config.api_key.is_none());
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.timeout, app.source_timeout());
    }

    #[tokio::test]
    async fn test_missing_key_fails_calls() {
        let client = offline(None);
        let query = NativeQuery { title: Some("batman".into()), ..Default::default() };

        assert!(matches!(client.search(&query).await, Err(SourceError::MissingApiKey)));
        assert!(matches!(client.get_detail("tt0468569").await, Err(SourceError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_search_without_title_is_empty() {
        let client = offline(Some("key"));
        let query = NativeQuery { year: Some("2008".into()), ..Default::default() };
        assert!(client.search(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let client = offline(Some("key"));
        let query = NativeQuery { title: Some("batman".into()), ..Default::default() };
        let err = client.search(&query).await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err}");
    }

    #[test]
    fn test_tag() {
        assert_eq!(offline(None).tag(), SourceTag::Omdb);
    }
}
