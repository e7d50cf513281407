use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::post::PostId;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest_middleware::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: Url },
    #[error("blog {0} not found")]
    NotFound(PostId),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
