//! Unified error types for marquee.
//!
//! Every failure surfaced to callers of the aggregation service is one of
//! these variants. Upstream failures are described by [`SourceError`] and only
//! become an [`Error`] once the pipeline decides they cannot be absorbed.
//!
//! [`SourceError`]: crate::source::SourceError

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the marquee pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid request parameters (no content filter, malformed year, bad page or limit).
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),

    /// Every upstream source failed, or a required key is missing.
    #[error("EXTERNAL_API_ERROR: {0}")]
    ExternalApi(String),

    /// Detail lookup for an unknown id.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The whole-request deadline elapsed before the upstream calls resolved.
    #[error("TIMEOUT: {0}")]
    Timeout(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::Validation(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::ExternalApi(msg) => (-32003, msg.clone()),
            Error::Timeout(msg) => (-32004, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("tt0468569".to_string());
        assert!(err.to_string().contains("NOT_FOUND"));
        assert!(err.to_string().contains("tt0468569"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let mcp_err: McpError = Error::Validation("limit".to_string()).into();
        assert_eq!(mcp_err.code.0, -32602);

        let mcp_err: McpError = Error::ExternalApi("down".to_string()).into();
        assert_eq!(mcp_err.code.0, -32003);

        let mcp_err: McpError = Error::NotFound("x".to_string()).into();
        assert_eq!(mcp_err.code.0, -32001);
    }
}
