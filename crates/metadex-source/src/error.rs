//! Error types for metadata sources.

use thiserror::Error;

/// Result type alias for metadata source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors returned by a listing or sync call.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("no datasource selected")]
    MissingDatasource,

    #[error("fixture error: {0}")]
    Fixture(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SourceError::Decode(e.to_string())
        } else {
            SourceError::Request(e.to_string())
        }
    }
}
