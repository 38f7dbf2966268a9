//! Error types for the visualization client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The engine answered with a non-success status
    #[error("{path} returned {status}: {body}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// HTTP client setup error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed engine address
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Sender or recipient not chosen
    #[error("Select both sender and recipient.")]
    MissingRoute,
}

impl Error {
    /// Whether the engine could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Request { .. })
    }
}
