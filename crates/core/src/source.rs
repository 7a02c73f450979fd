//! Upstream catalog source abstraction.
//!
//! Each catalog API is a [`MovieSource`]: it answers native searches and
//! detail lookups with its own raw payload type, and knows how to turn that
//! payload into a canonical [`Movie`]. Raw payloads never leave the source
//! and the normalizer; the pipeline only ever sees `Movie`.

use std::fmt;

use async_trait::async_trait;

use crate::movie::{MediaType, Movie, SearchRequest};

/// Identifies which upstream produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTag {
    Omdb,
    Tmdb,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTag::Omdb => f.write_str("omdb"),
            SourceTag::Tmdb => f.write_str("tmdb"),
        }
    }
}

/// Errors from an upstream catalog client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// No API key configured for this source.
    #[error("missing API key")]
    MissingApiKey,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    Unauthorized,

    /// Rate limited by the upstream.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Connection could not be established.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The requested id does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),
}

impl SourceError {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Timeout | SourceError::RateLimited | SourceError::Unreachable(_) => true,
            SourceError::Http { status } => *status >= 500,
            _ => false,
        }
    }
}

/// Why a raw record was discarded by a normalizer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropReason {
    #[error("record has neither title nor year")]
    MissingTitleAndYear,

    #[error("unmappable type: {0}")]
    UnknownType(String),
}

/// The subset of a search request that upstream APIs understand natively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeQuery {
    pub title: Option<String>,
    pub year: Option<String>,
    pub media_type: Option<MediaType>,
    /// List endpoints omit cast and genres; set when those are filtered on.
    pub needs_details: bool,
}

impl From<&SearchRequest> for NativeQuery {
    fn from(req: &SearchRequest) -> Self {
        Self {
            title: req.title().map(str::to_string),
            year: req.year().map(str::to_string),
            media_type: req.media_type,
            needs_details: req.actors().is_some() || req.genre().is_some(),
        }
    }
}

/// An upstream catalog.
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Source-specific payload, consumed only by [`MovieSource::normalize`].
    type Raw: Send;

    fn tag(&self) -> SourceTag;

    /// Run a native search.
    async fn search(&self, query: &NativeQuery) -> Result<Vec<Self::Raw>, SourceError>;

    /// Fetch a single record by this source's identifier.
    async fn get_detail(&self, id: &str) -> Result<Self::Raw, SourceError>;

    /// Convert a raw payload into a canonical record. Must be pure.
    fn normalize(&self, raw: Self::Raw) -> Result<Movie, DropReason>;
}

/// Trim a field and map empty strings to `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Enforce the invariant shared by every normalizer.
pub fn finish(movie: Movie) -> Result<Movie, DropReason> {
    if movie.title.trim().is_empty() && movie.year.trim().is_empty() {
        return Err(DropReason::MissingTitleAndYear);
    }
    Ok(movie)
}
