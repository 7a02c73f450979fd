//! Cross-source deduplication.

use std::collections::HashMap;

use crate::movie::Movie;

/// Identity of a work across sources: collapsed lower-case title plus year.
pub fn dedupe_key(movie: &Movie) -> (String, String) {
    let title = movie
        .title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (title, movie.year.trim().to_string())
}

/// Merge the primary and secondary contributions into one deduplicated list.
///
/// When both sides carry the same work, the primary record is kept and only
/// its empty fields are filled from the secondary one. Duplicates within a
/// single side are folded the same way, first occurrence winning.
pub fn merge(primary: Vec<Movie>, secondary: Vec<Movie>) -> Vec<Movie> {
    let mut index: HashMap<(String, String), usize> = HashMap::with_capacity(primary.len() + secondary.len());
    let mut merged: Vec<Movie> = Vec::with_capacity(primary.len() + secondary.len());

    for movie in primary.into_iter().chain(secondary) {
        let key = dedupe_key(&movie);
        match index.get(&key) {
            Some(&pos) => merged[pos].fill_gaps(movie),
            None => {
                index.insert(key, merged.len());
                merged.push(movie);
            }
        }
    }

    merged
}
