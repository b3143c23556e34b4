//! Client error types

use thiserror::Error;

/// Failure talking to the review API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport failure (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Any non-success HTTP status
    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Parse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// Failure submitting a review or comment
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required field is blank; nothing was sent
    #[error("Submission blocked: required fields are empty")]
    Blocked,

    #[error(transparent)]
    Api(#[from] ClientError),
}
