use thiserror::Error;

/// Failures of the one-shot catalog fetch. Every variant renders as a
/// user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Cannot connect to the server. Check that the backend is running at {domain}")]
    Connect { domain: String },

    #[error("Server error: {code} - {reason}")]
    Status { code: u16, reason: String },

    #[error("No response received from the server. Check the network connection.")]
    NoResponse,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("The API response is not a valid array ({0})")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailError {
    #[error("request for {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("HTTP {code} for {url}")]
    Status { url: String, code: u16 },

    #[error("could not decode image from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("image from {url} has no pixels")]
    Empty { url: String },

    #[error("thumbnail workers are not running")]
    PoolClosed,
}
