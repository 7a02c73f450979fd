//! Post-merge filter predicates.
//!
//! Every supplied content filter must match (logical AND). String comparisons
//! are case-insensitive on trimmed values. The title is not checked here: it is
//! sent to the upstream searches, whose relevance matching goes beyond the
//! display title (a "batman" search legitimately returns "The Dark Knight").
//!
//! `actors` and `genre` match when the filter is a substring of any single
//! comma-separated entry, so `"Bale"` matches `"Christian Bale, Heath Ledger"`. A record without an actors or
//! genre list never matches a filter on that field.

use crate::movie::{Movie, SearchRequest};

/// Borrow every movie that satisfies the request's content filters.
pub fn apply<'a>(movies: &'a [Movie], req: &SearchRequest) -> Vec<&'a Movie> {
    movies.iter().filter(|movie| matches(movie, req)).collect()
}

pub fn matches(movie: &Movie, req: &SearchRequest) -> bool {
    if let Some(actor) = req.actors()
        && !list_contains(movie.actors.as_deref(), actor)
    {
        return false;
    }

    if let Some(genre) = req.genre()
        && !list_contains(movie.genre.as_deref(), genre)
    {
        return false;
    }

    if let Some(media_type) = req.media_type
        && movie.media_type != media_type
    {
        return false;
    }

    if let Some(year) = req.year()
        && movie.year.trim() != year
    {
        return false;
    }

    true
}

fn list_contains(list: Option<&str>, needle: &str) -> bool {
    let Some(list) = list else {
        return false;
    };
    let needle = needle.trim().to_lowercase();

    list.split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .any(|entry| entry.contains(&needle))
}
