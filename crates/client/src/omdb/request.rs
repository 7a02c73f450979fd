//! OMDb query parameters.

use marquee_core::NativeQuery;
use serde::Serialize;

/// Query string for an OMDb call, minus the API key.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct OmdbParams {
    /// Search term (`s`), for list searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,

    /// IMDb id (`i`), for detail lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i: Option<String>,

    /// movie | series | episode.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,

    /// Release year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// short | full.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<&'static str>,
}

impl OmdbParams {
    /// List search. OMDb cannot search without a term, so `None` without a title.
    pub fn search(query: &NativeQuery) -> Option<Self> {
        let title = query.title.as_deref()?;
        Some(Self {
            s: Some(title.to_string()),
            kind: query.media_type.map(|t| t.as_str()),
            y: query.year.clone(),
            page: Some(1),
            ..Default::default()
        })
    }

    /// Full record for one IMDb id.
    pub fn detail(id: &str) -> Self {
        Self { i: Some(id.to_string()), plot: Some("full"), ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::MediaType;

    #[test]
    fn test_search_params() {
        let query = NativeQuery {
            title: Some("batman".into()),
            year: Some("2008".into()),
            media_type: Some(MediaType::Series),
            needs_details: false,
        };
        let params = OmdbParams::search(&query).unwrap();
        assert_eq!(params.s.as_deref(), Some("batman"));
        assert_eq!(params.kind, Some("series"));
        assert_eq!(params.y.as_deref(), Some("2008"));
        assert_eq!(params.page, Some(1));
        assert!(params.i.is_none());
    }

    #[test]
    fn test_no_title_no_search() {
        let query = NativeQuery { year: Some("2008".into()), ..Default::default() };
        assert!(OmdbParams::search(&query).is_none());
    }

    #[test]
    fn test_detail_params_serialize() {
        let params = OmdbParams::detail("tt0468569");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, serde_json::json!({ "i": "tt0468569", "plot": "full" }));
    }
}
