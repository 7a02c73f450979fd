//! Default ordering and page slicing.

use std::cmp::Ordering;

use crate::movie::Movie;

/// A slice of the filtered result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub movies: Vec<Movie>,
    pub total_results: usize,
    pub total_pages: usize,
}

/// Stable sort: rated records by descending rating, unrated ones after, ties by title.
pub fn sort_default(movies: &mut [&Movie]) {
    movies.sort_by(|a, b| compare_rating(a, b).then_with(|| compare_title(a, b)));
}

fn compare_rating(a: &Movie, b: &Movie) -> Ordering {
    match (a.rating_value(), b.rating_value()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_title(a: &Movie, b: &Movie) -> Ordering {
    a.title.to_lowercase().cmp(&b.title.to_lowercase())
}

/// Cut one page out of the (already ordered) result set.
///
/// `total_pages` is never below 1, and a page past the end is empty rather
/// than an error. Only the returned page is cloned.
pub fn paginate(movies: &[&Movie], page: u32, limit: u32) -> Page {
    let total_results = movies.len();
    let limit = limit.max(1) as usize;
    let total_pages = total_results.div_ceil(limit).max(1);

    let start = (page.max(1) as usize - 1).saturating_mul(limit);
    let slice = if start >= total_results {
        Vec::new()
    } else {
        let end = start.saturating_add(limit).min(total_results);
        movies[start..end].iter().map(|m| (*m).clone()).collect()
    };

    Page { movies: slice, total_results, total_pages }
}
