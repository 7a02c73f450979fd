//! Transport helpers shared by the catalog clients.

use std::time::Duration;

use marquee_core::SourceError;
use reqwest::{RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use url::Url;

/// Build the HTTP client used for one upstream.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| SourceError::Unreachable(format!("failed to build HTTP client: {e}")))
}

/// Resolve `path` below `base`, whether or not `base` ends with a slash.
pub fn endpoint(base: &str, path: &str) -> Result<Url, SourceError> {
    let root = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&root)
        .and_then(|url| url.join(path.trim_start_matches('/')))
        .map_err(|e| SourceError::Parse(format!("invalid endpoint {root}{path}: {e}")))
}

/// Map a non-success status to a source error.
pub fn check_status(status: StatusCode, what: &str) -> Result<(), SourceError> {
    match status.as_u16() {
        401 | 403 => Err(SourceError::Unauthorized),
        404 => Err(SourceError::NotFound(what.to_string())),
        429 => Err(SourceError::RateLimited),
        _ if status.is_client_error() || status.is_server_error() => Err(SourceError::Http { status: status.as_u16() }),
        _ => Ok(()),
    }
}

pub fn map_reqwest(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout
    } else if err.is_decode() {
        SourceError::Parse(err.to_string())
    } else {
        SourceError::Unreachable(err.to_string())
    }
}

/// Send a GET and decode its JSON body.
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T, SourceError> {
    let response = request
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(map_reqwest)?;

    let status = response.status();
    tracing::debug!(what, %status, "upstream response");
    check_status(status, what)?;

    let bytes = response.bytes().await.map_err(map_reqwest)?;
    serde_json::from_slice(&bytes).map_err(|e| SourceError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK, "x").is_ok());
        assert!(matches!(check_status(StatusCode::UNAUTHORIZED, "x"), Err(SourceError::Unauthorized)));
        assert!(matches!(check_status(StatusCode::FORBIDDEN, "x"), Err(SourceError::Unauthorized)));
        assert!(matches!(check_status(StatusCode::NOT_FOUND, "movie/1"), Err(SourceError::NotFound(w)) if w == "movie/1"));
        assert!(matches!(check_status(StatusCode::TOO_MANY_REQUESTS, "x"), Err(SourceError::RateLimited)));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, "x"),
            Err(SourceError::Http { status: 502 })
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_REQUEST, "x"),
            Err(SourceError::Http { status: 400 })
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = endpoint("https://api.themoviedb.org/3", "search/movie").unwrap();
        assert_eq!(url.as_str(), "https://api.themoviedb.org/3/search/movie");

        let url = endpoint("https://api.themoviedb.org/3/", "/tv/1399").unwrap();
        assert_eq!(url.as_str(), "https://api.themoviedb.org/3/tv/1399");

        let url = endpoint("https://www.omdbapi.com/", "").unwrap();
        assert_eq!(url.as_str(), "https://www.omdbapi.com/");

        assert!(endpoint("not a url", "x").is_err());
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(1), "marquee-test").is_ok());
    }
}
