//! Error types for the archive fetcher

use thiserror::Error;

/// Custom error types for the fetcher
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("year {year} is outside the archive range 1996..={max}")]
    YearOutOfRange { year: i32, max: i32 },

    #[error("invalid month: {0}")]
    InvalidMonth(u32),

    #[error("malformed manifest datetime: {0:?}")]
    MalformedDatetime(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    /// Check whether the error came from the network rather than local input
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Http(_))
    }
}
