//! TMDB endpoints and query parameters.

use std::fmt;

use marquee_core::{MediaType, NativeQuery};
use serde::Serialize;

/// Query used when the request carries no title.
pub const FALLBACK_QUERY: &str = "popular";

/// TMDB's two catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TmdbKind {
    Movie,
    Tv,
}

impl TmdbKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TmdbKind::Movie => "movie",
            TmdbKind::Tv => "tv",
        }
    }

    /// Catalogs to search for a requested type. TMDB has no episode search.
    pub fn for_media_type(media_type: Option<MediaType>) -> &'static [TmdbKind] {
        match media_type {
            None => &[TmdbKind::Movie, TmdbKind::Tv],
            Some(MediaType::Movie) => &[TmdbKind::Movie],
            Some(MediaType::Series) => &[TmdbKind::Tv],
            Some(MediaType::Episode) => &[],
        }
    }
}

impl fmt::Display for TmdbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `/search/{movie,tv}` parameters, minus the API key.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TmdbSearchParams {
    pub query: String,
    pub page: u32,
    pub include_adult: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_air_date_year: Option<String>,
}

impl TmdbSearchParams {
    pub fn new(kind: TmdbKind, query: &NativeQuery) -> Self {
        let (year, first_air_date_year) = match kind {
            TmdbKind::Movie => (query.year.clone(), None),
            TmdbKind::Tv => (None, query.year.clone()),
        };
        Self {
            query: query.title.clone().unwrap_or_else(|| FALLBACK_QUERY.to_string()),
            page: 1,
            include_adult: false,
            year,
            first_air_date_year,
        }
    }
}

/// `/{movie,tv}/{id}` parameters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TmdbDetailParams {
    pub append_to_response: &'static str,
}

impl Default for TmdbDetailParams {
    fn default() -> Self {
        Self { append_to_response: "credits" }
    }
}

/// Parse a detail id: `movie:155`, `tv:1399`, `tmdb:movie:155` or a bare number.
///
/// A bare number carries no kind; the caller tries both catalogs.
pub fn parse_id(id: &str) -> Option<(Option<TmdbKind>, u64)> {
    let id = id.trim();
    let id = id.strip_prefix("tmdb:").unwrap_or(id);

    let (kind, number) = match id.split_once(':') {
        Some(("movie", n)) => (Some(TmdbKind::Movie), n),
        Some(("tv", n)) => (Some(TmdbKind::Tv), n),
        Some(_) => return None,
        None => (None, id),
    };
    number.parse().ok().map(|n| (kind, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_for_media_type() {
        assert_eq!(TmdbKind::for_media_type(None), &[TmdbKind::Movie, TmdbKind::Tv]);
        assert_eq!(TmdbKind::for_media_type(Some(MediaType::Series)), &[TmdbKind::Tv]);
        assert!(TmdbKind::for_media_type(Some(MediaType::Episode)).is_empty());
    }

    #[test]
    fn test_year_parameter_per_kind() {
        let query = NativeQuery { title: Some("dune".into()), year: Some("2021".into()), ..Default::default() };

        let movie = TmdbSearchParams::new(TmdbKind::Movie, &query);
        assert_eq!(movie.year.as_deref(), Some("2021"));
        assert!(movie.first_air_date_year.is_none());

        let tv = TmdbSearchParams::new(TmdbKind::Tv, &query);
        assert!(tv.year.is_none());
        assert_eq!(tv.first_air_date_year.as_deref(), Some("2021"));
    }

    #[test]
    fn test_fallback_query() {
        let query = NativeQuery { year: Some("1999".into()), ..Default::default() };
        let params = TmdbSearchParams::new(TmdbKind::Movie, &query);
        assert_eq!(params.query, FALLBACK_QUERY);

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["include_adult"], false);
        assert!(value.get("first_air_date_year").is_none());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("movie:155"), Some((Some(TmdbKind::Movie), 155)));
        assert_eq!(parse_id("tmdb:tv:1399"), Some((Some(TmdbKind::Tv), 1399)));
        assert_eq!(parse_id(" 155 "), Some((None, 155)));
        assert_eq!(parse_id("person:1"), None);
        assert_eq!(parse_id("tt0468569"), None);
    }
}
