//! Aggregation service: the public entry point of the pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::aggregate::{filter, merge, paginate};
use crate::cache::{CacheStatus, DetailCache, FilterKey, SearchCache};
use crate::config::AppConfig;
use crate::movie::{Movie, PagedResult, SearchRequest};
use crate::source::{MovieSource, NativeQuery, SourceError};
use crate::Error;

/// Timing and validation knobs for the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Lifetime of search and detail cache entries.
    pub cache_ttl: Duration,
    /// Deadline for one source's share of a request, retries included.
    pub source_deadline: Duration,
    /// Deadline for resolving both upstream searches.
    pub request_timeout: Duration,
    /// Latest accepted release year.
    pub max_year: u16,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ServiceOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            cache_ttl: config.cache_ttl(),
            source_deadline: config.source_deadline(),
            request_timeout: config.request_timeout(),
            max_year: config.max_year,
        }
    }
}

/// Merged result set shared by every request waiting on the same fetch.
type Flight = Arc<OnceCell<Arc<Vec<Movie>>>>;

/// Orchestrates the two upstream sources, the caches and the pipeline stages.
///
/// `A` is the primary source: its values win field conflicts during merge and
/// it alone answers detail lookups. `B` adds titles `A` lacks.
///
/// Concurrent searches that share a [`FilterKey`] wait on a single upstream
/// fetch instead of each missing the cache on their own.
pub struct AggregationService<A, B> {
    primary: A,
    secondary: B,
    search_cache: Arc<SearchCache>,
    detail_cache: Arc<DetailCache>,
    in_flight: Mutex<HashMap<FilterKey, Flight>>,
    options: ServiceOptions,
    dropped: AtomicU64,
}

impl<A: MovieSource, B: MovieSource> AggregationService<A, B> {
    pub fn new(
        primary: A, secondary: B, search_cache: Arc<SearchCache>, detail_cache: Arc<DetailCache>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            primary,
            secondary,
            search_cache,
            detail_cache,
            in_flight: Mutex::new(HashMap::new()),
            options,
            dropped: AtomicU64::new(0),
        }
    }

    /// Status of the search cache.
    pub fn cache_status(&self) -> CacheStatus {
        self.search_cache.status()
    }

    /// Empty both the search and the detail cache.
    pub fn clear_cache(&self) {
        self.search_cache.clear();
        self.detail_cache.clear();
        tracing::info!("caches cleared");
    }

    /// Raw records discarded by the normalizers since startup.
    pub fn dropped_records(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Run a search and return the requested page.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` if the request is malformed
    /// - `Error::ExternalApi` if both sources fail
    /// - `Error::Timeout` if the upstream searches outlive the request deadline
    pub async fn search(&self, req: &SearchRequest) -> Result<PagedResult, Error> {
        req.validate(self.options.max_year)?;

        let key = FilterKey::from_request(req);
        let merged = self.resolve(key, req).await?;

        let mut matched = filter::apply(&merged, req);
        paginate::sort_default(&mut matched);
        let page = paginate::paginate(&matched, req.page, req.limit);

        Ok(PagedResult {
            movies: page.movies,
            total_results: page.total_results,
            page: req.page,
            total_pages: page.total_pages,
        })
    }

    /// Look up one record by id on the primary source.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` if the id is blank
    /// - `Error::NotFound` if the primary source does not know the id
    /// - `Error::ExternalApi` or `Error::Timeout` if the lookup itself fails
    pub async fn get_by_id(&self, id: &str) -> Result<Movie, Error> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::Validation("movie id is required".into()));
        }

        if let Some(cached) = self.detail_cache.get(&id.to_string()) {
            tracing::debug!(id, "detail cache hit");
            return Ok(Movie::clone(&cached));
        }

        let raw = match tokio::time::timeout(self.options.source_deadline, self.primary.get_detail(id)).await {
            Err(_) => {
                return Err(Error::Timeout(format!(
                    "detail lookup did not complete within {:?}",
                    self.options.source_deadline
                )));
            }
            Ok(Err(SourceError::NotFound(_))) => return Err(Error::NotFound(format!("movie not found: {id}"))),
            Ok(Err(SourceError::MissingApiKey)) => {
                return Err(Error::ExternalApi(format!("{} API key is not configured", self.primary.tag())));
            }
            Ok(Err(e)) => return Err(Error::ExternalApi(format!("{}: {e}", self.primary.tag()))),
            Ok(Ok(raw)) => raw,
        };

        let movie = self.primary.normalize(raw).map_err(|reason| {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(id, %reason, "detail record dropped by normalizer");
            Error::NotFound(format!("movie not found: {id}"))
        })?;

        self.detail_cache.put(id.to_string(), movie.clone(), self.options.cache_ttl);
        Ok(movie)
    }

    /// Cached result set for `key`, fetching it on a miss.
    ///
    /// The cache check and the flight registration happen under one lock, and
    /// a flight is unregistered only after its result is cached, so a request
    /// either hits the cache or joins the flight.
    async fn resolve(&self, key: FilterKey, req: &SearchRequest) -> Result<Arc<Vec<Movie>>, Error> {
        let flight = {
            let mut in_flight = self.in_flight.lock();
            if let Some(cached) = self.search_cache.get(&key) {
                tracing::debug!(key = %key, records = cached.len(), "search cache hit");
                return Ok(cached);
            }
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        tracing::debug!(key = %key, "search cache miss");

        let deadline = self.options.request_timeout;
        let result = tokio::time::timeout(deadline, flight.get_or_try_init(|| self.fetch_and_store(&key, req)))
            .await
            .map_err(|_| Error::Timeout(format!("search did not complete within {deadline:?}")))
            .and_then(|fetched| fetched.map(Arc::clone));

        let mut in_flight = self.in_flight.lock();
        if in_flight.get(&key).is_some_and(|current| Arc::ptr_eq(current, &flight)) {
            in_flight.remove(&key);
        }
        result
    }

    async fn fetch_and_store(&self, key: &FilterKey, req: &SearchRequest) -> Result<Arc<Vec<Movie>>, Error> {
        let merged = self.fetch_merged(req).await?;
        Ok(self.search_cache.put(key.clone(), merged, self.options.cache_ttl))
    }

    /// Fetch both sources concurrently, normalize and merge.
    async fn fetch_merged(&self, req: &SearchRequest) -> Result<Vec<Movie>, Error> {
        let query = NativeQuery::from(req);
        let start = Instant::now();

        let (primary, secondary) =
            tokio::join!(self.fetch_source(&self.primary, &query), self.fetch_source(&self.secondary, &query));

        if let (Err(a), Err(b)) = (&primary, &secondary) {
            tracing::error!(primary = %a, secondary = %b, "all upstream sources failed");
            return Err(Error::ExternalApi(format!(
                "all sources unavailable ({}: {a}; {}: {b})",
                self.primary.tag(),
                self.secondary.tag()
            )));
        }

        let primary = self.contribution(&self.primary, primary);
        let secondary = self.contribution(&self.secondary, secondary);
        let (primary_count, secondary_count) = (primary.len(), secondary.len());

        let merged = merge::merge(primary, secondary);
        tracing::debug!(
            primary = primary_count,
            secondary = secondary_count,
            merged = merged.len(),
            "fetched and merged in {:?}",
            start.elapsed()
        );

        Ok(merged)
    }

    async fn fetch_source<S: MovieSource>(&self, source: &S, query: &NativeQuery) -> Result<Vec<S::Raw>, SourceError> {
        match tokio::time::timeout(self.options.source_deadline, source.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout),
        }
    }

    /// Normalize a source's result, treating a failure as an empty contribution.
    fn contribution<S: MovieSource>(&self, source: &S, result: Result<Vec<S::Raw>, SourceError>) -> Vec<Movie> {
        let raws = match result {
            Ok(raws) => raws,
            Err(e) => {
                tracing::warn!(source = %source.tag(), error = %e, "source failed, continuing in degraded mode");
                return Vec::new();
            }
        };

        raws.into_iter()
            .filter_map(|raw| match source.normalize(raw) {
                Ok(movie) => Some(movie),
                Err(reason) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(source = %source.tag(), %reason, "record dropped by normalizer");
                    None
                }
            })
            .collect()
    }
}
