use rspotify::{ClientError, model::IdError};
use thiserror::Error;

/// Everything that can go wrong while turning a chart into a playlist
#[derive(Error, Debug)]
pub enum Error {
    /// Chart request failed, timed out or got a non-success status
    #[error("Chart request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Page or response did not have the expected structure
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Authorization flow failed, was cancelled, or authorized the wrong account
    #[error("Spotify authorization failed: {0}")]
    AuthError(String),

    /// Any failed Spotify API call
    #[error("Spotify error: {0}")]
    ApiError(#[from] ClientError),

    /// Id from Spotify that rspotify refuses to parse
    #[error("Spotify returned an invalid id: {0}")]
    InvalidId(#[from] IdError),

    /// Malformed date or year range
    #[error("Invalid chart date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Chart could not be written as JSON
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Missing or unusable settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
