//! Error types for external services.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The upstream answered with an `error` field for this coin.
    #[error("Coin not found: {0}")]
    CoinNotFound(String),

    /// Transport or parse failure talking to the upstream.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Collapse transport and parse errors into `UpstreamUnavailable`.
    pub fn into_upstream(self) -> Self {
        match self {
            Error::Http(e) => Error::UpstreamUnavailable(e.to_string()),
            Error::Json(e) => Error::UpstreamUnavailable(e.to_string()),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
