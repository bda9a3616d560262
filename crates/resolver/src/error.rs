use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolverError>;

/// Failure of a single identifier lookup. Never escapes the resolver: every
/// variant degrades to showing the raw identifier.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Lookup {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid flight timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Breadcrumb resolver must be created inside a tokio runtime")]
    NoRuntime,

    #[error("Configuration error: {0}")]
    Config(String),
}
