//! Canonical movie model and search request/response types.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Earliest release year accepted in a search request.
pub const MIN_YEAR: u16 = 1900;

/// Default page size when the caller does not pass one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            "episode" => Ok(MediaType::Episode),
            other => Err(Error::Validation(format!(
                "invalid type: {other} (expected movie, series or episode)"
            ))),
        }
    }
}

/// Canonical catalog entry produced by the normalizers.
///
/// Optional fields are `None` when the upstream had nothing for them; sentinel
/// strings such as `"N/A"` never survive normalization. `actors` and `genre`
/// are comma-delimited lists.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Movie {
    pub title: String,
    /// Four-digit release year, empty when unknown.
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
}

impl Movie {
    /// Minimal record with only the identifying fields set.
    pub fn new(title: impl Into<String>, year: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            external_id: None,
            media_type,
            poster: None,
            plot: None,
            director: None,
            actors: None,
            genre: None,
            rating: None,
            runtime: None,
            released: None,
        }
    }

    /// Copy every field this record lacks from `other`.
    ///
    /// Fields already present on `self` are never overwritten.
    pub fn fill_gaps(&mut self, other: Movie) {
        if self.title.is_empty() {
            self.title = other.title;
        }
        if self.year.is_empty() {
            self.year = other.year;
        }
        fill(&mut self.external_id, other.external_id);
        fill(&mut self.poster, other.poster);
        fill(&mut self.plot, other.plot);
        fill(&mut self.director, other.director);
        fill(&mut self.actors, other.actors);
        fill(&mut self.genre, other.genre);
        fill(&mut self.rating, other.rating);
        fill(&mut self.runtime, other.runtime);
        fill(&mut self.released, other.released);
    }

    /// Numeric rating, if the rating string parses.
    pub fn rating_value(&self) -> Option<f64> {
        self.rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite())
    }
}

fn fill(slot: &mut Option<String>, other: Option<String>) {
    if other.is_some() && slot.as_deref().is_none_or(str::is_empty) {
        *slot = other;
    }
}

/// A search over the aggregated catalog.
///
/// Content filters (`title`, `actors`, `genre`, `media_type`, `year`) decide
/// which records match; `page` and `limit` only slice the result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            title: None,
            actors: None,
            genre: None,
            media_type: None,
            year: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl SearchRequest {
    /// Trimmed title filter, `None` when absent or blank.
    pub fn title(&self) -> Option<&str> {
        present(&self.title)
    }

    /// Trimmed actors filter, `None` when absent or blank.
    pub fn actors(&self) -> Option<&str> {
        present(&self.actors)
    }

    /// Trimmed genre filter, `None` when absent or blank.
    pub fn genre(&self) -> Option<&str> {
        present(&self.genre)
    }

    /// Trimmed year filter, `None` when absent or blank.
    pub fn year(&self) -> Option<&str> {
        present(&self.year)
    }

    pub fn has_content_filter(&self) -> bool {
        self.title().is_some()
            || self.actors().is_some()
            || self.genre().is_some()
            || self.media_type.is_some()
            || self.year().is_some()
    }

    /// Validate the request before it enters the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if:
    /// - no content filter is present
    /// - `year` is not a four-digit number within `MIN_YEAR..=max_year`
    /// - `page` is 0
    /// - `limit` is outside `1..=MAX_LIMIT`
    pub fn validate(&self, max_year: u16) -> Result<(), Error> {
        if !self.has_content_filter() {
            return Err(Error::Validation("at least one search parameter is required".into()));
        }

        if let Some(year) = self.year() {
            let parsed = (year.len() == 4)
                .then(|| year.parse::<u16>().ok())
                .flatten()
                .ok_or_else(|| Error::Validation(format!("year must be a four-digit number: {year}")))?;
            if !(MIN_YEAR..=max_year).contains(&parsed) {
                return Err(Error::Validation(format!("year must be between {MIN_YEAR} and {max_year}")));
            }
        }

        if self.page == 0 {
            return Err(Error::Validation("page must be at least 1".into()));
        }

        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(Error::Validation(format!("limit must be between 1 and {MAX_LIMIT}")));
        }

        Ok(())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PagedResult {
    pub movies: Vec<Movie>,
    pub total_results: usize,
    pub page: u32,
    pub total_pages: usize,
}
