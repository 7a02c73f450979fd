//! OMDb response types and normalization.
//!
//! OMDb fields are PascalCase strings and use `"N/A"` for missing values. List
//! searches return a summary (title, year, id, type, poster); detail lookups
//! return the full record. Both decode into [`OmdbRecord`].

use std::sync::LazyLock;

use marquee_core::source::{clean, finish};
use marquee_core::{DropReason, MediaType, Movie, SourceError};
use regex::Regex;
use serde::Deserialize;

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// One OMDb title, either a search summary or a full detail record.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRecord {
    pub title: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub poster: Option<String>,
    pub plot: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub runtime: Option<String>,
    pub released: Option<String>,
}

/// `?s=` response body.
#[derive(Debug, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbRecord>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

/// `?i=` response body.
#[derive(Debug, Deserialize)]
pub struct OmdbDetailResponse {
    #[serde(flatten)]
    pub record: OmdbRecord,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

/// What an OMDb `Response: "False"` message means.
#[derive(Debug, Clone)]
pub enum OmdbFailure {
    /// Nothing matched; an empty result, not an error.
    NoMatch,
    Error(SourceError),
}

/// Classify the `Error` text OMDb sends alongside `Response: "False"`.
pub fn classify_error(message: &str) -> OmdbFailure {
    let lower = message.to_lowercase();
    if lower.contains("not found") || lower.contains("incorrect imdb id") || lower.contains("too many results") {
        OmdbFailure::NoMatch
    } else if lower.contains("api key") {
        OmdbFailure::Error(SourceError::Unauthorized)
    } else if lower.contains("limit reached") {
        OmdbFailure::Error(SourceError::RateLimited)
    } else {
        OmdbFailure::Error(SourceError::Parse(format!("OMDb error: {message}")))
    }
}

impl OmdbSearchResponse {
    pub fn into_records(self) -> Result<Vec<OmdbRecord>, SourceError> {
        if self.response.eq_ignore_ascii_case("true") {
            return Ok(self.search);
        }
        match classify_error(self.error.as_deref().unwrap_or_default()) {
            OmdbFailure::NoMatch => Ok(Vec::new()),
            OmdbFailure::Error(e) => Err(e),
        }
    }
}

impl OmdbDetailResponse {
    pub fn into_record(self, id: &str) -> Result<OmdbRecord, SourceError> {
        if self.response.eq_ignore_ascii_case("true") {
            return Ok(self.record);
        }
        match classify_error(self.error.as_deref().unwrap_or_default()) {
            OmdbFailure::NoMatch => Err(SourceError::NotFound(id.to_string())),
            OmdbFailure::Error(e) => Err(e),
        }
    }
}

/// Drop `"N/A"` and blank values.
fn present(value: Option<String>) -> Option<String> {
    clean(value).filter(|v| !v.eq_ignore_ascii_case("n/a"))
}

/// First four-digit run: series years look like `2008–2013` or `2019–`.
fn year_of(value: Option<String>) -> String {
    present(value)
        .and_then(|v| YEAR.find(&v).map(|m| m.as_str().to_string()))
        .unwrap_or_default()
}

fn media_type_of(kind: Option<&str>) -> Result<MediaType, DropReason> {
    let kind = kind.map(str::trim).unwrap_or_default().to_lowercase();
    match kind.as_str() {
        "movie" => Ok(MediaType::Movie),
        "series" => Ok(MediaType::Series),
        "episode" => Ok(MediaType::Episode),
        _ => Err(DropReason::UnknownType(kind)),
    }
}

/// Convert an OMDb record into the canonical shape.
pub fn normalize(raw: OmdbRecord) -> Result<Movie, DropReason> {
    let media_type = media_type_of(raw.kind.as_deref())?;

    let mut movie = Movie::new(present(raw.title).unwrap_or_default(), year_of(raw.year), media_type);
    movie.external_id = present(raw.imdb_id);
    movie.poster = present(raw.poster);
    movie.plot = present(raw.plot);
    movie.director = present(raw.director);
    movie.actors = present(raw.actors);
    movie.genre = present(raw.genre);
    movie.rating = present(raw.imdb_rating);
    movie.runtime = present(raw.runtime);
    movie.released = present(raw.released);

    finish(movie)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"{
        "Search": [
            {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie",
             "Poster": "https://m.media-amazon.com/images/M/batman-begins.jpg"},
            {"Title": "Batman: The Animated Series", "Year": "1992–1995", "imdbID": "tt0103359",
             "Type": "series", "Poster": "N/A"},
            {"Title": "Batman: Arkham City", "Year": "2011", "imdbID": "tt1568322", "Type": "game",
             "Poster": "N/A"}
        ],
        "totalResults": "3",
        "Response": "True"
    }"#;

    const DETAIL: &str = r#"{
        "Title": "The Dark Knight", "Year": "2008", "Rated": "PG-13", "Released": "18 Jul 2008",
        "Runtime": "152 min", "Genre": "Action, Crime, Drama", "Director": "Christopher Nolan",
        "Actors": "Christian Bale, Heath Ledger, Aaron Eckhart",
        "Plot": "When the menace known as the Joker wreaks havoc...",
        "Poster": "https://m.media-amazon.com/images/M/dark-knight.jpg",
        "imdbRating": "9.0", "imdbID": "tt0468569", "Type": "movie", "Response": "True"
    }"#;

    #[test]
    fn test_search_fixture() {
        let response: OmdbSearchResponse = serde_json::from_str(SEARCH).unwrap();
        let records = response.into_records().unwrap();
        assert_eq!(records.len(), 3);

        let movies: Vec<_> = records.into_iter().map(normalize).collect();
        let begins = movies[0].as_ref().unwrap();
        assert_eq!(begins.title, "Batman Begins");
        assert_eq!(begins.external_id.as_deref(), Some("tt0372784"));
        assert!(begins.actors.is_none());

        let series = movies[1].as_ref().unwrap();
        assert_eq!(series.year, "1992");
        assert_eq!(series.media_type, MediaType::Series);
        assert!(series.poster.is_none());

        assert_eq!(movies[2], Err(DropReason::UnknownType("game".into())));
    }

    #[test]
    fn test_detail_fixture() {
        let response: OmdbDetailResponse = serde_json::from_str(DETAIL).unwrap();
        let movie = normalize(response.into_record("tt0468569").unwrap()).unwrap();

        assert_eq!(movie.title, "The Dark Knight");
        assert_eq!(movie.year, "2008");
        assert_eq!(movie.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(movie.actors.as_deref(), Some("Christian Bale, Heath Ledger, Aaron Eckhart"));
        assert_eq!(movie.rating.as_deref(), Some("9.0"));
        assert_eq!(movie.runtime.as_deref(), Some("152 min"));
        assert_eq!(movie.released.as_deref(), Some("18 Jul 2008"));
    }

    #[test]
    fn test_not_available_is_absent() {
        let raw = OmdbRecord {
            title: Some("Obscure".into()),
            year: Some("1971".into()),
            kind: Some("movie".into()),
            plot: Some("N/A".into()),
            imdb_rating: Some("N/A".into()),
            actors: Some("  ".into()),
            ..Default::default()
        };
        let movie = normalize(raw).unwrap();
        assert!(movie.plot.is_none());
        assert!(movie.rating.is_none());
        assert!(movie.actors.is_none());
    }

    #[test]
    fn test_year_of_series_ranges() {
        assert_eq!(year_of(Some("2008–2013".into())), "2008");
        assert_eq!(year_of(Some("2019–".into())), "2019");
        assert_eq!(year_of(Some("N/A".into())), "");
        assert_eq!(year_of(None), "");
    }

    #[test]
    fn test_record_without_title_and_year_is_dropped() {
        let raw = OmdbRecord { title: Some("N/A".into()), year: Some("N/A".into()), kind: Some("movie".into()), ..Default::default() };
        assert_eq!(normalize(raw), Err(DropReason::MissingTitleAndYear));
    }

    #[test]
    fn test_false_responses() {
        let miss: OmdbSearchResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Movie not found!"}"#).unwrap();
        assert!(miss.into_records().unwrap().is_empty());

        let bad_key: OmdbSearchResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Invalid API key!"}"#).unwrap();
        assert!(matches!(bad_key.into_records(), Err(SourceError::Unauthorized)));

        let limit: OmdbSearchResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Request limit reached!"}"#).unwrap();
        assert!(matches!(limit.into_records(), Err(SourceError::RateLimited)));

        let unknown: OmdbDetailResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#).unwrap();
        assert!(matches!(unknown.into_record("tt0"), Err(SourceError::NotFound(id)) if id == "tt0"));
    }
}
