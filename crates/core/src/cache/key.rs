//! Cache key derivation for search results.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::movie::SearchRequest;

/// Cache key for a merged search result.
///
/// Derived only from the content filters of a request, so every page of the
/// same logical query maps to one entry. Text filters are trimmed and
/// lower-cased before hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey(String);

impl FilterKey {
    pub fn from_request(req: &SearchRequest) -> Self {
        let params = serde_json::json!({
            "title": req.title().map(str::to_lowercase),
            "actors": req.actors().map(str::to_lowercase),
            "genre": req.genre().map(str::to_lowercase),
            "type": req.media_type.map(|t| t.as_str()),
            "year": req.year(),
        });

        let mut hasher = Sha256::new();
        hasher.update(params.to_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&SearchRequest> for FilterKey {
    fn from(req: &SearchRequest) -> Self {
        Self::from_request(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::MediaType;

    fn batman() -> SearchRequest {
        SearchRequest { title: Some("batman".into()), ..Default::default() }
    }

    #[test]
    fn test_key_stability() {
        assert_eq!(FilterKey::from_request(&batman()), FilterKey::from_request(&batman()));
    }

    #[test]
    fn test_key_ignores_pagination() {
        let page_one = batman();
        let page_two = SearchRequest { page: 2, limit: 50, ..batman() };
        assert_eq!(FilterKey::from(&page_one), FilterKey::from(&page_two));
    }

    #[test]
    fn test_key_normalizes_text_filters() {
        let shouty = SearchRequest { title: Some("  BATMAN ".into()), ..Default::default() };
        assert_eq!(FilterKey::from(&shouty), FilterKey::from(&batman()));
    }

    #[test]
    fn test_key_different_filters() {
        let typed = SearchRequest { media_type: Some(MediaType::Series), ..batman() };
        let with_year = SearchRequest { year: Some("2008".into()), ..batman() };
        let with_actor = SearchRequest { actors: Some("Bale".into()), ..batman() };

        let base = FilterKey::from(&batman());
        assert_ne!(base, FilterKey::from(&typed));
        assert_ne!(base, FilterKey::from(&with_year));
        assert_ne!(base, FilterKey::from(&with_actor));
    }

    #[test]
    fn test_key_format() {
        let key = FilterKey::from(&batman());
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
