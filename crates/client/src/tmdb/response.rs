//! TMDB response types and normalization.

use chrono::{Datelike, NaiveDate};
use marquee_core::source::{clean, finish};
use marquee_core::{DropReason, MediaType, Movie};
use serde::Deserialize;

/// Cast members kept in `actors`.
const TOP_CAST: usize = 5;

/// `/search/*` page.
#[derive(Debug, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbRecord>,
}

/// A movie or a TV show, as a search hit or a detail record.
///
/// `media_type` is filled in by the client from the endpoint that produced
/// the record; search endpoints scoped to one catalog omit it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbRecord {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<TmdbNamed>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub created_by: Vec<TmdbNamed>,
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbNamed {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbNamed>,
    #[serde(default)]
    pub crew: Vec<TmdbCrew>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbCrew {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let joined = names
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

/// Year of a `YYYY-MM-DD` date, or its first four characters if it does not parse.
fn year_of(date: Option<&str>) -> String {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return String::new();
    };
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.year().to_string(),
        Err(_) => date
            .get(..4)
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
            .unwrap_or_default(),
    }
}

fn poster_url(image_base_url: &str, path: Option<String>) -> Option<String> {
    let path = clean(path)?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path);
    }
    Some(format!("{}/{}", image_base_url.trim_end_matches('/'), path.trim_start_matches('/')))
}

/// Convert a TMDB record into the canonical shape.
pub fn normalize(raw: TmdbRecord, image_base_url: &str) -> Result<Movie, DropReason> {
    let kind = raw.media_type.as_deref().map(str::trim).unwrap_or_default().to_lowercase();
    let media_type = match kind.as_str() {
        "movie" => MediaType::Movie,
        "tv" => MediaType::Series,
        _ => return Err(DropReason::UnknownType(kind)),
    };

    let date = clean(raw.release_date).or_else(|| clean(raw.first_air_date));
    let title = clean(raw.title).or_else(|| clean(raw.name)).unwrap_or_default();
    let mut movie = Movie::new(title, year_of(date.as_deref()), media_type);

    movie.external_id = clean(raw.imdb_id).or_else(|| Some(format!("tmdb:{kind}:{}", raw.id)));
    movie.poster = poster_url(image_base_url, raw.poster_path);
    movie.plot = clean(raw.overview);
    movie.rating = raw.vote_average.filter(|v| *v > 0.0).map(|v| format!("{v:.1}"));
    movie.genre = join_names(raw.genres.iter().map(|g| g.name.as_str()));

    let credits = raw.credits.unwrap_or_default();
    movie.director = credits
        .crew
        .iter()
        .find(|c| c.job.eq_ignore_ascii_case("director"))
        .and_then(|c| clean(Some(c.name.clone())))
        .or_else(|| join_names(raw.created_by.iter().map(|p| p.name.as_str())));
    movie.actors = join_names(credits.cast.iter().take(TOP_CAST).map(|c| c.name.as_str()));

    let minutes = match media_type {
        MediaType::Movie => raw.runtime,
        _ => raw.episode_run_time.first().copied(),
    };
    movie.runtime = minutes.filter(|m| *m > 0).map(|m| format!("{m} min"));
    movie.released = date;

    finish(movie)
}
