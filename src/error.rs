use reqwest::StatusCode;
use thiserror::Error;

/// The content source could not deliver a usable response.
///
/// Callers of [`crate::post::Blog`] never see this: a failed fetch degrades
/// to an empty post list and is only logged.
#[derive(Debug, Error)]
pub enum SourceUnavailable {
    #[error("request to content source failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("content source responded with {0}")]
    Status(StatusCode),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content source returned malformed json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("content source rejected the query: {}", .0.join("; "))]
    Query(Vec<String>),
}
