//! TMDB v3 API client, the secondary catalog source.
//!
//! ### Endpoints
//!
//! - **Search**: `GET {base}/search/movie` and `GET {base}/search/tv`, both
//!   issued concurrently when the request has no type
//! - **Detail**: `GET {base}/{movie,tv}/{id}?append_to_response=credits`
//! - **Authentication**: `api_key` query parameter
//!
//! Search hits lack cast, crew and genre names; when a search filters on
//! actors or genre each hit is replaced by its detail record, four at a time.

pub mod request;
pub mod response;

pub use request::{TmdbKind, TmdbSearchParams, parse_id};
pub use response::{TmdbPage, TmdbRecord};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::{StreamExt, future, stream};
use marquee_core::{AppConfig, DropReason, Movie, MovieSource, NativeQuery, SourceError, SourceTag};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::http;
use crate::retry::RetryPolicy;
use request::TmdbDetailParams;

/// Default API root.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default poster prefix.
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "marquee/0.1";

/// Detail lookups in flight at once during enrichment.
const DETAIL_CONCURRENCY: usize = 4;

/// TMDB client configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// v3 API key; calls fail with `MissingApiKey` while unset.
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&AppConfig> for TmdbConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.tmdb_api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.tmdb_base_url.clone(),
            image_base_url: config.tmdb_image_base_url.clone(),
            timeout: config.source_timeout(),
            user_agent: config.user_agent.clone(),
            retry: RetryPolicy::from(config),
        }
    }
}

/// TMDB API client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, SourceError> {
        let http = http::build_client(config.timeout, &config.user_agent)?;
        Ok(Self { http, config })
    }

    fn api_key(&self) -> Result<&str, SourceError> {
        self.config.api_key.as_deref().ok_or(SourceError::MissingApiKey)
    }

    async fn call<T, P>(&self, path: &str, params: &P) -> Result<T, SourceError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let key = self.api_key()?;
        let url = http::endpoint(&self.config.base_url, path)?;
        self.config
            .retry
            .run(path, || {
                let request = self.http.get(url.clone()).query(&[("api_key", key)]).query(params);
                http::get_json(request, path)
            })
            .await
    }

    /// Search every catalog the query's type maps to.
    ///
    /// One failing catalog is tolerated when the other answers; the source
    /// fails only when all of them do.
    pub async fn search_records(&self, query: &NativeQuery) -> Result<Vec<TmdbRecord>, SourceError> {
        self.api_key()?;
        let kinds = TmdbKind::for_media_type(query.media_type);
        if kinds.is_empty() {
            tracing::debug!("tmdb search skipped: no catalog for {:?}", query.media_type);
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let outcomes = future::join_all(kinds.iter().map(|kind| self.search_kind(*kind, query))).await;

        let mut records = Vec::new();
        let mut first_error = None;
        for (kind, outcome) in kinds.iter().zip(outcomes) {
            match outcome {
                Ok(found) => records.extend(found),
                Err(e) => {
                    tracing::warn!(catalog = %kind, error = %e, "tmdb catalog search failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error
            && records.is_empty()
        {
            return Err(e);
        }

        tracing::debug!("tmdb search returned {} records in {:?}", records.len(), start.elapsed());
        Ok(records)
    }

    async fn search_kind(&self, kind: TmdbKind, query: &NativeQuery) -> Result<Vec<TmdbRecord>, SourceError> {
        let params = TmdbSearchParams::new(kind, query);
        let page: TmdbPage = self.call(&format!("search/{kind}"), &params).await?;
        let hits: Vec<TmdbRecord> = page
            .results
            .into_iter()
            .map(|mut r| {
                r.media_type = Some(kind.as_str().to_string());
                r
            })
            .collect();

        if query.needs_details && !hits.is_empty() {
            return Ok(self.enrich(kind, hits).await);
        }
        Ok(hits)
    }

    /// Fetch one title with its credits.
    pub async fn detail_record(&self, kind: TmdbKind, id: u64) -> Result<TmdbRecord, SourceError> {
        let mut record: TmdbRecord = self.call(&format!("{kind}/{id}"), &TmdbDetailParams::default()).await?;
        record.media_type = Some(kind.as_str().to_string());
        Ok(record)
    }

    async fn enrich(&self, kind: TmdbKind, hits: Vec<TmdbRecord>) -> Vec<TmdbRecord> {
        stream::iter(hits)
            .map(|summary| async move {
                match self.detail_record(kind, summary.id).await {
                    Ok(full) => full,
                    Err(e) => {
                        tracing::warn!(catalog = %kind, id = summary.id, error = %e, "tmdb enrichment failed, keeping summary");
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
impl MovieSource for TmdbClient {
    type Raw = TmdbRecord;

    fn tag(&self) -> SourceTag {
        SourceTag::Tmdb
    }

    async fn search(&self, query: &NativeQuery) -> Result<Vec<TmdbRecord>, SourceError> {
        self.search_records(query).await
    }

    /// Accepts `movie:{n}`, `tv:{n}`, `tmdb:{kind}:{n}` or a bare number,
    /// which is tried as a movie first and then as a show.
    async fn get_detail(&self, id: &str) -> Result<TmdbRecord, SourceError> {
        self.api_key()?;
        let Some((kind, number)) = parse_id(id) else {
            return Err(SourceError::NotFound(id.to_string()));
        };

        match kind {
            Some(kind) => self.detail_record(kind, number).await,
            None => match self.detail_record(TmdbKind::Movie, number).await {
                Err(SourceError::NotFound(_)) => self.detail_record(TmdbKind::Tv, number).await,
                other => other,
            },
        }
    }

    fn normalize(&self, raw: TmdbRecord) -> Result<Movie, DropReason> {
        response::normalize(raw, &self.config.image_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::MediaType;

    fn offline(api_key: Option<&str>) -> TmdbClient {
        TmdbClient::new(TmdbConfig {
            api_key: api_key.map(str::to_string),
            base_url: "http://127.0.0.1:9/3".into(),
            timeout: Duration::from_millis(200),
            retry: RetryPolicy::none(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            tmdb_api_key: Some("abc".into()),
            tmdb_image_base_url: "https://img.example/w342".into(),
            ..Default::default()
        };
        let config = TmdbConfig::from(&app);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.image_base_url, "https://img.example/w342");
    }

    #[tokio::test]
    async fn test_missing_key_fails_calls() {
        let client = offline(None);
        assert!(matches!(client.search(&NativeQuery::default()).await, Err(SourceError::MissingApiKey)));
        assert!(matches!(client.get_detail("movie:155").await, Err(SourceError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_episode_search_is_empty() {
        let client = offline(Some("key"));
        let query = NativeQuery { media_type: Some(MediaType::Episode), ..Default::default() };
        assert!(client.search(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_id_is_not_found() {
        let client = offline(Some("key"));
        assert!(matches!(client.get_detail("tt0468569").await, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_all_catalogs_failing_is_an_error() {
        let client = offline(Some("key"));
        let query = NativeQuery { title: Some("dune".into()), ..Default::default() };
        let err = client.search(&query).await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err}");
    }

    #[test]
    fn test_normalize_uses_configured_image_base() {
        let client = TmdbClient::new(TmdbConfig {
            image_base_url: "https://img.example/w342/".into(),
            ..Default::default()
        })
        .unwrap();
        let record = TmdbRecord {
            id: 7,
            media_type: Some("movie".into()),
            title: Some("Se7en".into()),
            release_date: Some("1995-09-22".into()),
            poster_path: Some("/poster.jpg".into()),
            ..Default::default()
        };
        let movie = client.normalize(record).unwrap();
        assert_eq!(movie.poster.as_deref(), Some("https://img.example/w342/poster.jpg"));
    }
}
